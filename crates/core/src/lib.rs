#![forbid(unsafe_code)]

pub mod error;
pub mod fallback;
pub mod model;
pub mod session;
pub mod submission;

pub use error::Error;
pub use session::{
    Advance, CompletionPolicy, QuestionSource, QuestionnaireSession, SessionError, SessionPhase,
    SessionProgress, SubmissionStatus,
};
pub use submission::{ResponseItem, SubmissionPayload, build_responses};

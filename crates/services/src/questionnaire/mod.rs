mod service;

// Public API of the questionnaire subsystem.
pub use crate::error::QuestionnaireError;
pub use service::QuestionnaireService;

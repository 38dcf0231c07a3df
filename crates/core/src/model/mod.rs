mod answer;
mod ids;
mod question;
mod result;

pub use answer::{AnswerError, AnswerSheet, ChoiceIndex};
pub use ids::{ChoiceId, MajorId, ParseIdError, QuestionId, ResultId};
pub use question::{Choice, Question, QuestionError, validate_question_set};
pub use result::{Major, MajorMatch, RecordedResponse, Recommendation, ResultRecord};

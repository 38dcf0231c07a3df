mod questionnaire_vm;
mod result_vm;
mod time_fmt;

pub use questionnaire_vm::{ChoiceVm, QuestionnaireIntent, QuestionnaireStage, QuestionnaireVm};
pub use result_vm::{AnswerLineVm, HistoryEntryVm, MajorMatchVm, ResultVm, map_history_entries};
pub use time_fmt::format_date;

mod history;
mod questionnaire;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use history::HistoryView;
pub use questionnaire::QuestionnaireView;
pub use results::{ResultDetailView, ResultsView};
pub use state::{ViewError, ViewState, view_state_from_resource};

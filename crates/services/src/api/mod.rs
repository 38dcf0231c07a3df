mod http;
mod memory;

use async_trait::async_trait;

use futurepath_core::model::{Question, Recommendation, ResultId, ResultRecord};
use futurepath_core::SubmissionPayload;

use crate::error::ApiError;

pub use memory::InMemoryQuestionnaireApi;

/// Backend contract the questionnaire depends on.
#[async_trait]
pub trait QuestionnaireApi: Send + Sync {
    /// Fetch the ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the backend cannot supply questions.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError>;

    /// Submit answers and receive the recommendation payload.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the backend rejects or never receives the answers.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Recommendation, ApiError>;

    /// List the current user's stored results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on backend failures.
    async fn list_results(&self) -> Result<Vec<ResultRecord>, ApiError>;

    /// Fetch one stored result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on backend failures, including an unknown id.
    async fn result_details(&self, id: ResultId) -> Result<Recommendation, ApiError>;
}

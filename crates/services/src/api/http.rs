use async_trait::async_trait;

use futurepath_core::model::{Question, Recommendation, ResultId, ResultRecord};
use futurepath_core::SubmissionPayload;

use super::QuestionnaireApi;
use crate::client::ApiClient;
use crate::error::ApiError;

const QUESTIONS_PATH: &str = "questionnaire/questions/";
const SUBMIT_PATH: &str = "questionnaire/submit/";
const RESULTS_PATH: &str = "questionnaire/results/";

#[async_trait]
impl QuestionnaireApi for ApiClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        let questions: Vec<Question> = self.get_json(QUESTIONS_PATH).await?;
        tracing::debug!(count = questions.len(), "questions fetched");
        Ok(questions)
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<Recommendation, ApiError> {
        tracing::debug!(responses = payload.len(), "submitting questionnaire");
        self.post_json(SUBMIT_PATH, payload).await
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, ApiError> {
        self.get_json(RESULTS_PATH).await
    }

    async fn result_details(&self, id: ResultId) -> Result<Recommendation, ApiError> {
        self.get_json(&format!("{RESULTS_PATH}{id}/")).await
    }
}

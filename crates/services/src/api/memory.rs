use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use futurepath_core::model::{Question, Recommendation, ResultId, ResultRecord};
use futurepath_core::SubmissionPayload;

use super::QuestionnaireApi;
use crate::error::ApiError;

#[derive(Default)]
struct State {
    questions: Option<Vec<Question>>,
    recommendation: Value,
    results: Vec<ResultRecord>,
    failing_submissions: u32,
    submissions: Vec<SubmissionPayload>,
}

/// Simple in-memory backend for testing and prototyping.
///
/// Starts out unable to serve questions (as if the backend were down) until
/// [`InMemoryQuestionnaireApi::with_questions`] is called.
#[derive(Clone, Default)]
pub struct InMemoryQuestionnaireApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryQuestionnaireApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(self, questions: Vec<Question>) -> Self {
        self.update(|state| state.questions = Some(questions));
        self
    }

    #[must_use]
    pub fn with_recommendation(self, recommendation: Value) -> Self {
        self.update(|state| state.recommendation = recommendation);
        self
    }

    #[must_use]
    pub fn with_results(self, results: Vec<ResultRecord>) -> Self {
        self.update(|state| state.results = results);
        self
    }

    /// Make the next `count` submissions fail with a 503.
    pub fn fail_next_submissions(&self, count: u32) {
        self.update(|state| state.failing_submissions = count);
    }

    /// Every payload received so far, failed attempts included.
    #[must_use]
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.lock()
            .map(|state| state.submissions.clone())
            .unwrap_or_default()
    }

    fn update(&self, apply: impl FnOnce(&mut State)) {
        if let Ok(mut state) = self.lock() {
            apply(&mut state);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }
}

fn service_unavailable() -> ApiError {
    ApiError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: json!({"detail": "Service unavailable."}),
    }
}

#[async_trait]
impl QuestionnaireApi for InMemoryQuestionnaireApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.lock()?.questions.clone().ok_or_else(service_unavailable)
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<Recommendation, ApiError> {
        let mut state = self.lock()?;
        state.submissions.push(payload.clone());
        if state.failing_submissions > 0 {
            state.failing_submissions -= 1;
            return Err(service_unavailable());
        }
        Ok(Recommendation::new(state.recommendation.clone()))
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, ApiError> {
        Ok(self.lock()?.results.clone())
    }

    async fn result_details(&self, id: ResultId) -> Result<Recommendation, ApiError> {
        let state = self.lock()?;
        let record = state
            .results
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| ApiError::Status {
                status: StatusCode::NOT_FOUND,
                body: json!({"detail": "Not found."}),
            })?;
        serde_json::to_value(record)
            .map(Recommendation::new)
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }
}

use std::sync::Arc;

use futurepath_core::fallback;
use futurepath_core::model::{Recommendation, ResultId, ResultRecord};
use futurepath_core::{
    Advance, CompletionPolicy, QuestionSource, QuestionnaireSession, SubmissionPayload,
};

use crate::api::QuestionnaireApi;
use crate::error::{ApiError, QuestionnaireError};

/// Starts questionnaire sessions and carries their answers to the backend.
#[derive(Clone)]
pub struct QuestionnaireService {
    api: Arc<dyn QuestionnaireApi>,
    policy: CompletionPolicy,
}

impl QuestionnaireService {
    #[must_use]
    pub fn new(api: Arc<dyn QuestionnaireApi>) -> Self {
        Self {
            api,
            policy: CompletionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Fetch the question set and open a session on it.
    ///
    /// A failed fetch, an empty list or a malformed set falls back to the
    /// bundled questions; the caller always gets a usable session.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError::Session` only if the bundled set itself is
    /// rejected.
    pub async fn start_session(&self) -> Result<QuestionnaireSession, QuestionnaireError> {
        let remote = match self.api.fetch_questions().await {
            Ok(questions) => {
                QuestionnaireSession::new(questions, QuestionSource::Remote, self.policy)
                    .map_err(|err| err.to_string())
            }
            Err(err) => Err(err.to_string()),
        };

        match remote {
            Ok(session) => {
                tracing::info!(
                    questions = session.questions().len(),
                    "questionnaire session started"
                );
                Ok(session)
            }
            Err(reason) => {
                tracing::warn!(%reason, "question fetch unusable; using bundled questions");
                let session = QuestionnaireSession::new(
                    fallback::questions(),
                    QuestionSource::Fallback,
                    self.policy,
                )?;
                Ok(session)
            }
        }
    }

    /// Advance the session, submitting the answers when it leaves the last
    /// question.
    ///
    /// A rejected submission is recorded on the session rather than returned
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError::Session` if the session refuses the result.
    pub async fn advance(
        &self,
        session: &mut QuestionnaireSession,
    ) -> Result<Advance, QuestionnaireError> {
        let step = session.advance();
        if let Advance::Submit(payload) = &step {
            self.deliver(session, payload).await?;
        }
        Ok(step)
    }

    /// Resend the answers of a session whose submission failed.
    ///
    /// Returns false when there was nothing to retry.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError::Session` if the session refuses the result.
    pub async fn retry(&self, session: &mut QuestionnaireSession) -> Result<bool, QuestionnaireError> {
        let Some(payload) = session.retry_submission() else {
            return Ok(false);
        };
        self.deliver(session, &payload).await?;
        Ok(true)
    }

    /// Raw submission call, for callers that apply the outcome themselves.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the backend call fails.
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<Recommendation, ApiError> {
        self.api.submit(payload).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the backend call fails.
    pub async fn list_results(&self) -> Result<Vec<ResultRecord>, ApiError> {
        self.api.list_results().await
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the backend call fails.
    pub async fn result_details(&self, id: ResultId) -> Result<Recommendation, ApiError> {
        self.api.result_details(id).await
    }

    async fn deliver(
        &self,
        session: &mut QuestionnaireSession,
        payload: &SubmissionPayload,
    ) -> Result<(), QuestionnaireError> {
        let outcome = self.submit(payload).await.map_err(|err| {
            tracing::warn!(error = %err, "questionnaire submission failed");
            err.user_message()
        });
        if outcome.is_ok() {
            tracing::info!(responses = payload.len(), "questionnaire submitted");
        }
        session.finish_submission(outcome)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryQuestionnaireApi;
    use futurepath_core::model::{Choice, ChoiceId, ChoiceIndex, Question, QuestionId};
    use futurepath_core::{SessionPhase, SubmissionStatus};
    use serde_json::json;

    fn question(id: u64, choice_ids: &[u64]) -> Question {
        let choices = choice_ids
            .iter()
            .map(|c| Choice::new(ChoiceId::new(*c), format!("choice {c}")))
            .collect();
        Question::new(QuestionId::new(id), format!("question {id}"), choices).unwrap()
    }

    fn service(api: &InMemoryQuestionnaireApi) -> QuestionnaireService {
        QuestionnaireService::new(Arc::new(api.clone()))
    }

    #[tokio::test]
    async fn start_session_uses_remote_questions() {
        let api = InMemoryQuestionnaireApi::new().with_questions(vec![question(5, &[50, 51])]);
        let session = service(&api).start_session().await.unwrap();
        assert_eq!(session.source(), QuestionSource::Remote);
        assert_eq!(session.questions().len(), 1);
        assert_eq!(session.current_question().id, QuestionId::new(5));
    }

    #[tokio::test]
    async fn start_session_falls_back_on_failure_empty_or_malformed() {
        let cases = [
            InMemoryQuestionnaireApi::new(),
            InMemoryQuestionnaireApi::new().with_questions(Vec::new()),
            InMemoryQuestionnaireApi::new().with_questions(vec![Question {
                id: QuestionId::new(1),
                text: "no choices".into(),
                order: None,
                choices: Vec::new(),
            }]),
        ];
        for api in cases {
            let session = service(&api).start_session().await.unwrap();
            assert_eq!(session.source(), QuestionSource::Fallback);
            assert_eq!(session.questions(), fallback::questions().as_slice());
            assert_eq!(session.phase(), SessionPhase::Ready);
            assert_eq!(session.current_index(), 0);
        }
    }

    #[tokio::test]
    async fn advance_submits_on_last_question() {
        let api = InMemoryQuestionnaireApi::new()
            .with_questions(vec![question(1, &[10, 11])])
            .with_recommendation(json!({"top_majors": []}));
        let svc = service(&api);
        let mut session = svc.start_session().await.unwrap();

        assert_eq!(svc.advance(&mut session).await.unwrap(), Advance::Blocked);
        assert!(api.submissions().is_empty());

        session.record_answer(QuestionId::new(1), ChoiceIndex::new(1));
        let step = svc.advance(&mut session).await.unwrap();
        assert!(matches!(step, Advance::Submit(_)));
        assert_eq!(session.submission_status(), SubmissionStatus::Succeeded);
        assert!(session.is_completed());
        assert_eq!(api.submissions().len(), 1);
        assert_eq!(api.submissions()[0].responses[0].choice_id, ChoiceId::new(11));
    }

    #[tokio::test]
    async fn failed_submission_is_recorded_and_retryable() {
        let api = InMemoryQuestionnaireApi::new().with_questions(vec![question(1, &[10])]);
        api.fail_next_submissions(1);
        let svc = service(&api);
        let mut session = svc.start_session().await.unwrap();
        session.record_answer(QuestionId::new(1), ChoiceIndex::new(0));

        svc.advance(&mut session).await.unwrap();
        assert_eq!(session.submission_status(), SubmissionStatus::Failed);
        assert_eq!(session.last_error(), Some("Server error. Please try again later."));
        assert!(!session.is_completed());

        assert!(svc.retry(&mut session).await.unwrap());
        assert!(session.is_completed());
        assert_eq!(api.submissions().len(), 2);
        assert!(!svc.retry(&mut session).await.unwrap());
    }
}

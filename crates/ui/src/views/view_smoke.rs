use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futurepath_core::model::{
    Choice, ChoiceId, Major, MajorId, Question, QuestionId, Recommendation, ResultId, ResultRecord,
};
use futurepath_core::{CompletionPolicy, SubmissionPayload, SubmissionStatus};
use serde_json::json;
use services::{ApiError, InMemoryQuestionnaireApi, QuestionnaireApi, StatusCode};

use super::test_harness::{ViewKind, setup_view_harness};
use crate::vm::QuestionnaireIntent;

fn questions() -> Vec<Question> {
    (1..=2)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Do you enjoy topic {id}?"),
                vec![
                    Choice::new(ChoiceId::new(id * 10 + 1), "Very much"),
                    Choice::new(ChoiceId::new(id * 10 + 2), "Not really"),
                ],
            )
            .unwrap()
        })
        .collect()
}

fn api() -> InMemoryQuestionnaireApi {
    InMemoryQuestionnaireApi::new()
        .with_questions(questions())
        .with_recommendation(json!({
            "top_majors": [{"id": 3, "name": "Civil Engineering", "confidence": 84.0}]
        }))
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_view_walks_to_results() {
    let api = api();
    let mut harness = setup_view_harness(
        ViewKind::Questionnaire,
        Arc::new(api.clone()),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Do you enjoy topic 1?"), "missing question in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");

    harness.dispatch(QuestionnaireIntent::Select("0".into()));
    harness.dispatch(QuestionnaireIntent::Next);
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Question 2 of 2"), "missing progress in {html}");
    assert!(html.contains("Complete"), "missing complete button in {html}");

    harness.dispatch(QuestionnaireIntent::Select("1".into()));
    harness.dispatch(QuestionnaireIntent::Next);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your recommended majors"), "missing results in {html}");
    assert!(html.contains("Civil Engineering"), "missing major in {html}");
    assert!(harness.inspect_session(|s| s.is_completed()));

    let sent = api.submissions();
    assert_eq!(sent.len(), 1);
    let choices: Vec<u64> = sent[0].responses.iter().map(|r| r.choice_id.value()).collect();
    assert_eq!(choices, vec![11, 22]);
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_view_ignores_out_of_range_choice() {
    let mut harness = setup_view_harness(
        ViewKind::Questionnaire,
        Arc::new(api()),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuestionnaireIntent::Select("7".into()));
    harness.dispatch(QuestionnaireIntent::Next);
    assert_eq!(harness.inspect_session(|s| s.current_index()), 0);
    assert!(harness.inspect_session(|s| s.current_answer().is_none()));
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_view_offers_retry_after_failed_submission() {
    let api = api();
    api.fail_next_submissions(1);
    let mut harness = setup_view_harness(
        ViewKind::Questionnaire,
        Arc::new(api.clone()),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    for raw in ["0", "0"] {
        harness.dispatch(QuestionnaireIntent::Select(raw.into()));
        harness.dispatch(QuestionnaireIntent::Next);
    }
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Server error. Please try again later."), "missing error in {html}");
    assert!(html.contains("Retry submission"), "missing retry in {html}");
    assert!(!harness.inspect_session(|s| s.is_completed()));

    harness.dispatch(QuestionnaireIntent::Retry);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Civil Engineering"), "missing major in {html}");
    assert_eq!(api.submissions().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn optimistic_view_completes_before_submission_resolves() {
    let mut harness = setup_view_harness(
        ViewKind::Questionnaire,
        Arc::new(api()),
        CompletionPolicy::Optimistic,
    );
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuestionnaireIntent::Select("1".into()));
    harness.dispatch(QuestionnaireIntent::Next);
    harness.dispatch(QuestionnaireIntent::Select("1".into()));
    harness.dispatch(QuestionnaireIntent::Next);

    assert!(harness.inspect_session(|s| s.is_completed()));
    assert_eq!(
        harness.inspect_session(|s| s.submission_status()),
        SubmissionStatus::Pending
    );
    harness.settle().await;
    assert_eq!(
        harness.inspect_session(|s| s.submission_status()),
        SubmissionStatus::Succeeded
    );
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_view_uses_bundled_questions_when_backend_is_down() {
    let mut harness = setup_view_harness(
        ViewKind::Questionnaire,
        Arc::new(InMemoryQuestionnaireApi::new()),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 7"), "missing progress in {html}");
    assert!(html.contains("Showing the standard question set."), "missing notice in {html}");
}

fn record(id: u64, major: &str) -> ResultRecord {
    ResultRecord {
        id: ResultId::new(id),
        major: Major {
            id: MajorId::new(id),
            name: major.to_string(),
            description: String::new(),
        },
        score: 77.0,
        date_taken: Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap(),
        responses: Vec::new(),
        top_majors: Vec::new(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_lists_results() {
    let api = InMemoryQuestionnaireApi::new().with_results(vec![record(5, "Pharmacy")]);
    let mut harness =
        setup_view_harness(ViewKind::History, Arc::new(api), CompletionPolicy::Confirmed);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Pharmacy"), "missing major in {html}");
    assert!(html.contains("Jun 14, 2024"), "missing date in {html}");
    assert!(html.contains("77.0%"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_detail_view_renders_stored_result() {
    let api = InMemoryQuestionnaireApi::new().with_results(vec![record(5, "Pharmacy")]);
    let mut harness = setup_view_harness(
        ViewKind::ResultDetail(5),
        Arc::new(api),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your recommended majors"), "missing title in {html}");
    assert!(html.contains("Pharmacy"), "missing major in {html}");
}

struct FailingApi;

fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: json!({"detail": "boom"}),
    }
}

#[async_trait]
impl QuestionnaireApi for FailingApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        Err(server_error())
    }

    async fn submit(&self, _payload: &SubmissionPayload) -> Result<Recommendation, ApiError> {
        Err(server_error())
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, ApiError> {
        Err(server_error())
    }

    async fn result_details(&self, _id: ResultId) -> Result<Recommendation, ApiError> {
        Err(server_error())
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_renders_error_state() {
    let mut harness = setup_view_harness(
        ViewKind::History,
        Arc::new(FailingApi),
        CompletionPolicy::Confirmed,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Server error. Please try again later."), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

use futurepath_core::model::{ChoiceIndex, QuestionId};
use futurepath_core::{QuestionSource, QuestionnaireSession, SessionPhase, SubmissionStatus};

use crate::vm::result_vm::ResultVm;

const FALLBACK_FAILURE: &str = "Failed to submit questionnaire. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionnaireIntent {
    /// Raw value of the picked radio input, validated against the current question.
    Select(String),
    Previous,
    Next,
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionnaireStage {
    Answering,
    Submitting,
    Failed { message: String, can_retry: bool },
    Completed(ResultVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: ChoiceIndex,
    pub text: String,
    pub selected: bool,
}

/// Everything the questionnaire view renders, derived from one session snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionnaireVm {
    pub question_id: QuestionId,
    pub question_text: String,
    pub choices: Vec<ChoiceVm>,
    pub progress_label: String,
    pub progress_percent: u8,
    pub answered_label: String,
    pub can_select: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub next_label: &'static str,
    pub using_fallback: bool,
    pub is_completed: bool,
    pub stage: QuestionnaireStage,
}

impl QuestionnaireVm {
    #[must_use]
    pub fn from_session(session: &QuestionnaireSession) -> Self {
        let question = session.current_question();
        let selected = session.current_answer();
        let progress = session.progress();

        let choices = question
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let index = ChoiceIndex::new(index);
                ChoiceVm {
                    index,
                    text: choice.text.clone(),
                    selected: selected == Some(index),
                }
            })
            .collect();

        Self {
            question_id: question.id,
            question_text: question.text.clone(),
            choices,
            progress_label: format!("Question {} of {}", progress.position, progress.total),
            progress_percent: progress.percent,
            answered_label: format!("{} of {} answered", progress.answered, progress.total),
            can_select: session.phase() == SessionPhase::Ready,
            can_go_back: session.can_retreat(),
            can_go_next: session.can_advance(),
            next_label: if session.is_last() { "Complete" } else { "Next" },
            using_fallback: session.source() == QuestionSource::Fallback,
            is_completed: session.is_completed(),
            stage: stage_of(session),
        }
    }
}

fn stage_of(session: &QuestionnaireSession) -> QuestionnaireStage {
    if session.phase() == SessionPhase::Ready {
        return QuestionnaireStage::Answering;
    }
    match session.submission_status() {
        SubmissionStatus::Succeeded => {
            QuestionnaireStage::Completed(session.result().map(ResultVm::from).unwrap_or_default())
        }
        SubmissionStatus::Failed => QuestionnaireStage::Failed {
            message: session
                .last_error()
                .unwrap_or(FALLBACK_FAILURE)
                .to_string(),
            can_retry: session.can_retry(),
        },
        SubmissionStatus::Idle | SubmissionStatus::Pending => QuestionnaireStage::Submitting,
    }
}

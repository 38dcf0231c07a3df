use std::fmt;

use thiserror::Error;

use crate::error::Error;
use crate::model::{
    AnswerSheet, ChoiceIndex, Question, QuestionError, QuestionId, Recommendation,
    validate_question_set,
};
use crate::submission::SubmissionPayload;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session is not awaiting a submission result")]
    NotSubmitting,
    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// When the session counts as completed relative to the submission call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Completed only once the backend accepted the answers. A failed
    /// submission can be retried.
    #[default]
    Confirmed,
    /// Completed as soon as the last question is advanced past, before the
    /// submission resolves. A failed submission is final.
    Optimistic,
}

/// Where the session's questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Answering questions; navigation is allowed.
    Ready,
    /// Answers handed off for submission; navigation is locked.
    Submitting,
    /// Submission resolved for good.
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Outcome of [`QuestionnaireSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Nothing changed: the current question is unanswered or the session is
    /// no longer answering.
    Blocked,
    /// Moved to the question at `index`.
    Moved { index: usize },
    /// The last question was answered; send this payload to the backend and
    /// report back through [`QuestionnaireSession::finish_submission`].
    Submit(SubmissionPayload),
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub percent: u8,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one questionnaire attempt.
///
/// Owns the question set for its whole lifetime and steps through it by
/// index. A fresh value is built for every attempt; nothing is persisted.
pub struct QuestionnaireSession {
    questions: Vec<Question>,
    source: QuestionSource,
    policy: CompletionPolicy,
    current: usize,
    answers: AnswerSheet,
    phase: SessionPhase,
    status: SubmissionStatus,
    is_completed: bool,
    result: Option<Recommendation>,
    last_error: Option<String>,
}

impl QuestionnaireSession {
    /// Start a session positioned on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty and
    /// `SessionError::Question` if the set is malformed.
    pub fn new(
        questions: Vec<Question>,
        source: QuestionSource,
        policy: CompletionPolicy,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        validate_question_set(&questions)?;

        Ok(Self {
            questions,
            source,
            policy,
            current: 0,
            answers: AnswerSheet::new(),
            phase: SessionPhase::Ready,
            status: SubmissionStatus::Idle,
            is_completed: false,
            result: None,
            last_error: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn source(&self) -> QuestionSource {
        self.source
    }

    #[must_use]
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current` is kept within bounds and the set is never empty.
        &self.questions[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<ChoiceIndex> {
        self.answers.get(question_id)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<ChoiceIndex> {
        self.answers.get(self.current_question().id)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn submission_status(&self) -> SubmissionStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub fn result(&self) -> Option<&Recommendation> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.phase == SessionPhase::Ready && self.current_answer().is_some()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.phase == SessionPhase::Ready && self.current > 0
    }

    /// True when a submission failed and may be sent again.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.phase == SessionPhase::Submitting && self.status == SubmissionStatus::Failed
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let position = self.current + 1;
        let percent = u8::try_from(position * 100 / total).unwrap_or(100);
        SessionProgress {
            position,
            total,
            answered: self.answers.len(),
            percent,
        }
    }

    /// Record (or overwrite) the answer for a question.
    ///
    /// The index is trusted; range checks happen where it is produced. Returns
    /// false, leaving the session untouched, for unknown question ids or once
    /// the answers have been handed off for submission.
    pub fn record_answer(&mut self, question_id: QuestionId, index: ChoiceIndex) -> bool {
        if self.phase != SessionPhase::Ready {
            return false;
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return false;
        }
        self.answers.record(question_id, index);
        true
    }

    /// Record a raw form value (e.g. `"2"`) as the answer to the current
    /// question. Returns whether it was recorded, as [`Self::record_answer`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Answer` if `raw` is not a valid choice index for the
    /// current question; the session is left untouched.
    pub fn answer_current(&mut self, raw: &str) -> Result<bool, Error> {
        let question = self.current_question();
        let index = ChoiceIndex::for_question(question, raw)?;
        let question_id = question.id;
        Ok(self.record_answer(question_id, index))
    }

    /// Move to the next question, or hand off the answers when on the last one.
    pub fn advance(&mut self) -> Advance {
        if !self.can_advance() {
            return Advance::Blocked;
        }

        if !self.is_last() {
            self.current += 1;
            return Advance::Moved {
                index: self.current,
            };
        }

        self.phase = SessionPhase::Submitting;
        self.status = SubmissionStatus::Pending;
        if self.policy == CompletionPolicy::Optimistic {
            self.is_completed = true;
        }
        Advance::Submit(self.payload())
    }

    /// Step back one question. Returns whether the index moved.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Apply the backend's answer to the pending submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` if no submission is pending.
    pub fn finish_submission(
        &mut self,
        outcome: Result<Recommendation, String>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Submitting || self.status != SubmissionStatus::Pending {
            return Err(SessionError::NotSubmitting);
        }

        match outcome {
            Ok(result) => {
                self.status = SubmissionStatus::Succeeded;
                self.phase = SessionPhase::Done;
                self.is_completed = true;
                self.result = Some(result);
                self.last_error = None;
            }
            Err(message) => {
                self.status = SubmissionStatus::Failed;
                self.last_error = Some(message);
                if self.policy == CompletionPolicy::Optimistic {
                    self.phase = SessionPhase::Done;
                }
            }
        }
        Ok(())
    }

    /// Re-arm a failed submission, returning the payload to send again.
    pub fn retry_submission(&mut self) -> Option<SubmissionPayload> {
        if !self.can_retry() {
            return None;
        }
        self.status = SubmissionStatus::Pending;
        Some(self.payload())
    }

    /// Submission body for the answers recorded so far.
    #[must_use]
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::from_answers(&self.questions, &self.answers)
    }
}

impl fmt::Debug for QuestionnaireSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionnaireSession")
            .field("questions_len", &self.questions.len())
            .field("source", &self.source)
            .field("policy", &self.policy)
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("phase", &self.phase)
            .field("status", &self.status)
            .field("is_completed", &self.is_completed)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

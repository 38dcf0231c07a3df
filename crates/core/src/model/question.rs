use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::ChoiceIndex;
use crate::model::ids::{ChoiceId, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {question_id} has no choices")]
    NoChoices { question_id: QuestionId },

    #[error("question {question_id} lists choice {choice_id} more than once")]
    DuplicateChoice {
        question_id: QuestionId,
        choice_id: ChoiceId,
    },

    #[error("question {question_id} appears more than once")]
    DuplicateQuestion { question_id: QuestionId },
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
}

impl Choice {
    #[must_use]
    pub fn new(id: ChoiceId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// A questionnaire prompt with its ordered choices.
///
/// Choice order matters: answers are recorded as indices into `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub choices: Vec<Choice>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoChoices` for an empty choice list and
    /// `QuestionError::DuplicateChoice` when a choice id repeats.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            id,
            text: text.into(),
            order: None,
            choices,
        };
        question.validate()?;
        Ok(question)
    }

    /// Check the shape invariants of a question received over the wire.
    ///
    /// # Errors
    ///
    /// See [`Question::new`].
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.choices.is_empty() {
            return Err(QuestionError::NoChoices {
                question_id: self.id,
            });
        }
        let mut seen = HashSet::with_capacity(self.choices.len());
        for choice in &self.choices {
            if !seen.insert(choice.id) {
                return Err(QuestionError::DuplicateChoice {
                    question_id: self.id,
                    choice_id: choice.id,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn choice(&self, index: ChoiceIndex) -> Option<&Choice> {
        self.choices.get(index.value())
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

/// Validate a full question set: every question well-formed, ids unique.
///
/// # Errors
///
/// Returns the first `QuestionError` found.
pub fn validate_question_set(questions: &[Question]) -> Result<(), QuestionError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        question.validate()?;
        if !seen.insert(question.id) {
            return Err(QuestionError::DuplicateQuestion {
                question_id: question.id,
            });
        }
    }
    Ok(())
}

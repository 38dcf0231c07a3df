use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("answer {raw:?} is not a choice index")]
    NotANumber { raw: String },

    #[error("choice index {index} is out of range for question {question_id} ({count} choices)")]
    OutOfRange {
        question_id: QuestionId,
        index: usize,
        count: usize,
    },
}

/// Zero-based position of the selected choice within its question.
///
/// This is deliberately not the choice id; the id is resolved only when the
/// submission payload is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChoiceIndex(usize);

impl ChoiceIndex {
    /// Unchecked constructor. The session trusts its callers to pass indices
    /// produced by [`ChoiceIndex::for_question`].
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }

    /// Parse a raw form value (e.g. a radio input's `"2"`) and bounds-check it
    /// against the question it answers.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::NotANumber` or `AnswerError::OutOfRange`.
    pub fn for_question(question: &Question, raw: &str) -> Result<Self, AnswerError> {
        let index = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| AnswerError::NotANumber {
                raw: raw.to_string(),
            })?;
        Self::checked(question, index)
    }

    /// Bounds-check an already numeric index.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::OutOfRange` when `index >= question.choices.len()`.
    pub fn checked(question: &Question, index: usize) -> Result<Self, AnswerError> {
        let count = question.choice_count();
        if index >= count {
            return Err(AnswerError::OutOfRange {
                question_id: question.id,
                index,
                count,
            });
        }
        Ok(Self(index))
    }
}

/// Answers recorded during one session, keyed by question.
///
/// Entries are added or overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: BTreeMap<QuestionId, ChoiceIndex>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer, returning the one it replaced.
    pub fn record(&mut self, question_id: QuestionId, index: ChoiceIndex) -> Option<ChoiceIndex> {
        self.entries.insert(question_id, index)
    }

    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<ChoiceIndex> {
        self.entries.get(&question_id).copied()
    }

    #[must_use]
    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.entries.contains_key(&question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, ChoiceIndex)> + '_ {
        self.entries.iter().map(|(id, index)| (*id, *index))
    }
}

impl FromIterator<(QuestionId, ChoiceIndex)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, ChoiceIndex)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

//! Conversion of recorded answers into the backend submission body.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerSheet, ChoiceId, Question, QuestionId};

/// One `(question, choice)` pair as the submission endpoint expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseItem {
    pub question_id: QuestionId,
    pub choice_id: ChoiceId,
}

/// Request body of the submission endpoint: `{ "responses": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub responses: Vec<ResponseItem>,
}

impl SubmissionPayload {
    #[must_use]
    pub fn from_answers(questions: &[Question], answers: &AnswerSheet) -> Self {
        Self {
            responses: build_responses(questions, answers),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Resolve each recorded choice index to its choice id.
///
/// Answers for questions missing from `questions`, or whose index falls
/// outside the question's choices, are dropped. The output follows the answer
/// sheet's key order, which carries no meaning for the backend.
#[must_use]
pub fn build_responses(questions: &[Question], answers: &AnswerSheet) -> Vec<ResponseItem> {
    answers
        .iter()
        .filter_map(|(question_id, index)| {
            let question = questions.iter().find(|q| q.id == question_id)?;
            let choice = question.choice(index)?;
            Some(ResponseItem {
                question_id,
                choice_id: choice.id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::{Choice, ChoiceIndex};

    fn question(id: u64, choice_ids: &[u64]) -> Question {
        let choices = choice_ids
            .iter()
            .map(|c| Choice::new(ChoiceId::new(*c), format!("choice {c}")))
            .collect();
        Question::new(QuestionId::new(id), format!("question {id}"), choices).unwrap()
    }

    fn item(question_id: u64, choice_id: u64) -> ResponseItem {
        ResponseItem {
            question_id: QuestionId::new(question_id),
            choice_id: ChoiceId::new(choice_id),
        }
    }

    #[test]
    fn resolves_indices_to_choice_ids() {
        let questions = vec![question(1, &[10, 11]), question(2, &[20, 21])];
        let answers: AnswerSheet = [
            (QuestionId::new(1), ChoiceIndex::new(1)),
            (QuestionId::new(2), ChoiceIndex::new(0)),
        ]
        .into_iter()
        .collect();

        let got: HashSet<_> = build_responses(&questions, &answers).into_iter().collect();
        let want: HashSet<_> = [item(1, 11), item(2, 20)].into_iter().collect();
        assert_eq!(got, want);
    }

    #[test]
    fn skips_unknown_question_ids() {
        let questions = vec![question(1, &[10, 11])];
        let answers: AnswerSheet = [
            (QuestionId::new(1), ChoiceIndex::new(0)),
            (QuestionId::new(99), ChoiceIndex::new(0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(build_responses(&questions, &answers), vec![item(1, 10)]);
    }

    #[test]
    fn skips_out_of_range_indices() {
        let questions = vec![question(1, &[10, 11]), question(2, &[20])];
        let answers: AnswerSheet = [
            (QuestionId::new(1), ChoiceIndex::new(5)),
            (QuestionId::new(2), ChoiceIndex::new(0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(build_responses(&questions, &answers), vec![item(2, 20)]);
    }

    #[test]
    fn payload_serializes_to_wire_shape() {
        let payload = SubmissionPayload {
            responses: vec![item(1, 11)],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"responses": [{"question_id": 1, "choice_id": 11}]})
        );
    }
}

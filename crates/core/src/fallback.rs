//! Question set bundled with the client, used when the backend cannot supply one.

use crate::model::{Choice, ChoiceId, Question, QuestionId};

const FALLBACK: &[(&str, [&str; 4])] = &[
    (
        "How do you react when you see blood or injuries?",
        [
            "I remain calm and want to help",
            "I can handle it but prefer not to deal with it",
            "I feel uncomfortable but can manage if necessary",
            "I avoid situations involving blood or injuries",
        ],
    ),
    (
        "How do you handle being responsible for important tasks?",
        [
            "I enjoy taking charge of important responsibilities",
            "I can handle responsibility when it's assigned to me",
            "I prefer sharing responsibility with others",
            "I feel stressed when given too much responsibility",
        ],
    ),
    (
        "In a group project, what role do you naturally take?",
        [
            "I usually become the leader and organize the team",
            "I contribute creative ideas and solutions",
            "I focus on completing specific assigned tasks",
            "I help maintain harmony and support team members",
        ],
    ),
    (
        "How do you react in emergency situations?",
        [
            "I stay calm and take action to help",
            "I follow instructions and support others",
            "I remain calm but prefer others to take the lead",
            "I find it difficult to think clearly under pressure",
        ],
    ),
    (
        "How do you feel about public speaking?",
        [
            "I enjoy presenting and speaking in front of others",
            "I can present effectively when prepared",
            "I get nervous but can manage with preparation",
            "I avoid public speaking whenever possible",
        ],
    ),
    (
        "How do you approach solving complex problems?",
        [
            "I enjoy analyzing data and finding patterns",
            "I like to break problems down into manageable steps",
            "I prefer creative and innovative approaches",
            "I collaborate with others to find solutions",
        ],
    ),
    (
        "How do you feel about working with numbers and data?",
        [
            "I love working with numbers and analyzing data",
            "I can work with data when given clear methods",
            "I understand basic statistics but prefer other tasks",
            "I find data analysis challenging and uninteresting",
        ],
    ),
];

/// The bundled question set.
///
/// Question ids start at 1; choice ids are `question_id * 10 + n` with `n`
/// counting from 1.
#[must_use]
pub fn questions() -> Vec<Question> {
    (1_u64..)
        .zip(FALLBACK)
        .map(|(question_id, (text, choices))| Question {
            id: QuestionId::new(question_id),
            text: (*text).to_string(),
            order: None,
            choices: (1_u64..)
                .zip(choices)
                .map(|(n, label)| Choice::new(ChoiceId::new(question_id * 10 + n), *label))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::validate_question_set;

    #[test]
    fn fallback_set_is_valid_and_non_empty() {
        let questions = questions();
        assert_eq!(questions.len(), 7);
        validate_question_set(&questions).unwrap();
    }

    #[test]
    fn fallback_choice_ids_follow_question_ids() {
        let questions = questions();
        let third = &questions[2];
        assert_eq!(third.id, QuestionId::new(3));
        let ids: Vec<u64> = third.choices.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![31, 32, 33, 34]);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ids::{ChoiceId, MajorId, QuestionId, ResultId};

/// Opaque payload the backend returns for a submission or result lookup.
///
/// The session stores it untouched; only display code peeks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(Value);

impl Recommendation {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Best-effort read of the `top_majors` list. Entries that do not match the
    /// expected shape are skipped.
    #[must_use]
    pub fn top_majors(&self) -> Vec<MajorMatch> {
        self.0
            .get("top_majors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Backend `detail` message, present when there is nothing to show.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.0.get("detail").and_then(Value::as_str)
    }
}

/// A recommended major with its confidence percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorMatch {
    pub id: MajorId,
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
    pub id: MajorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One answered question as echoed back in a stored result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub question: QuestionId,
    #[serde(default)]
    pub question_text: String,
    pub choice: ChoiceId,
    #[serde(default)]
    pub choice_text: String,
}

/// A stored questionnaire result from the user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: ResultId,
    pub major: Major,
    pub score: f64,
    pub date_taken: DateTime<Utc>,
    #[serde(default)]
    pub responses: Vec<RecordedResponse>,
    #[serde(default)]
    pub top_majors: Vec<MajorMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_majors_reads_valid_entries() {
        let rec = Recommendation::new(json!({
            "id": 9,
            "top_majors": [
                {"id": 1, "name": "Nursing", "confidence": 100},
                {"name": "missing id"},
                {"id": 2, "name": "Public Health", "confidence": 87.5}
            ]
        }));
        let majors = rec.top_majors();
        assert_eq!(majors.len(), 2);
        assert_eq!(majors[0].name, "Nursing");
        assert!((majors[1].confidence - 87.5).abs() < f64::EPSILON);
    }

    #[test]
    fn top_majors_empty_for_detail_only_payload() {
        let rec = Recommendation::new(json!({"detail": "No results available."}));
        assert!(rec.top_majors().is_empty());
        assert_eq!(rec.detail(), Some("No results available."));
    }

    #[test]
    fn result_record_parses_history_item() {
        let raw = json!({
            "id": 3,
            "user": 12,
            "major": {"id": 5, "name": "Statistics", "description": "Numbers"},
            "score": 92.0,
            "date_taken": "2025-03-01T10:15:00Z",
            "responses": [
                {"id": 1, "question": 1, "question_text": "Q", "choice": 11, "choice_text": "B"}
            ]
        });
        let record: ResultRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, ResultId::new(3));
        assert_eq!(record.major.name, "Statistics");
        assert_eq!(record.responses.len(), 1);
        assert!(record.top_majors.is_empty());
    }
}

use futurepath_core::model::{MajorMatch, Recommendation, RecordedResponse, ResultRecord};
use serde_json::Value;

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MajorMatchVm {
    pub name: String,
    pub confidence_label: String,
}

impl From<&MajorMatch> for MajorMatchVm {
    fn from(item: &MajorMatch) -> Self {
        Self {
            name: item.name.clone(),
            confidence_label: percent_label(item.confidence),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerLineVm {
    pub question: String,
    pub choice: String,
}

/// Display form of a recommendation payload.
///
/// The payload is opaque; anything that does not match the expected shape is
/// left out rather than reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultVm {
    pub majors: Vec<MajorMatchVm>,
    pub answers: Vec<AnswerLineVm>,
    pub detail: Option<String>,
}

impl ResultVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }
}

impl From<&Recommendation> for ResultVm {
    fn from(recommendation: &Recommendation) -> Self {
        let value = recommendation.as_value();

        let mut majors: Vec<MajorMatchVm> = recommendation
            .top_majors()
            .iter()
            .map(MajorMatchVm::from)
            .collect();
        // Stored results carry a single `major` with its `score` instead.
        if majors.is_empty() {
            majors.extend(primary_major(value));
        }

        let answers = value
            .get("responses")
            .cloned()
            .and_then(|raw| serde_json::from_value::<Vec<RecordedResponse>>(raw).ok())
            .unwrap_or_default()
            .into_iter()
            .map(|response| AnswerLineVm {
                question: response.question_text,
                choice: response.choice_text,
            })
            .collect();

        Self {
            majors,
            answers,
            detail: recommendation.detail().map(str::to_string),
        }
    }
}

fn primary_major(value: &Value) -> Option<MajorMatchVm> {
    let name = value.get("major")?.get("name")?.as_str()?;
    let score = value.get("score").and_then(Value::as_f64)?;
    Some(MajorMatchVm {
        name: name.to_string(),
        confidence_label: percent_label(score),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntryVm {
    pub id: u64,
    pub major: String,
    pub score_label: String,
    pub taken_on: String,
}

impl From<&ResultRecord> for HistoryEntryVm {
    fn from(record: &ResultRecord) -> Self {
        Self {
            id: record.id.value(),
            major: record.major.name.clone(),
            score_label: percent_label(record.score),
            taken_on: format_date(record.date_taken),
        }
    }
}

/// Newest first.
#[must_use]
pub fn map_history_entries(records: &[ResultRecord]) -> Vec<HistoryEntryVm> {
    let mut sorted: Vec<&ResultRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date_taken.cmp(&a.date_taken));
    sorted.into_iter().map(HistoryEntryVm::from).collect()
}

fn percent_label(value: f64) -> String {
    format!("{value:.1}%")
}

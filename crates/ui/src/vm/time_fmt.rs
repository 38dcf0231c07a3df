use chrono::{DateTime, Utc};

/// Calendar date as shown in result lists, e.g. `Mar 5, 2024`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

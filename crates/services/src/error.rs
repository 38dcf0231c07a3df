//! Shared error types for the services crate.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use futurepath_core::SessionError;

const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
const GENERIC_DETAIL: &str = "Something went wrong. Please try again.";

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API URL {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid request timeout {raw:?}")]
    InvalidTimeout { raw: String },
}

/// Errors emitted by backend calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("no authentication token available")]
    MissingToken,
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed with status {status}")]
    Status { status: StatusCode, body: Value },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status of a rejected request, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Text suitable for showing to the person using the app.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingToken => "You are not logged in. Please log in to continue.".to_string(),
            Self::Status { status, body } => status_message(*status, body),
            Self::InvalidUrl(_) | Self::Unavailable(_) | Self::Http(_) => {
                NETWORK_MESSAGE.to_string()
            }
        }
    }
}

fn status_message(status: StatusCode, body: &Value) -> String {
    let detail = body.get("detail").and_then(Value::as_str);
    match status.as_u16() {
        400 => bad_request_message(detail, body),
        401 => "Authentication failed. Please log in again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        500 | 502 | 503 => "Server error. Please try again later.".to_string(),
        code => format!("Error: {code} - {}", detail.unwrap_or(GENERIC_DETAIL)),
    }
}

fn bad_request_message(detail: Option<&str>, body: &Value) -> String {
    if let Some(detail) = detail {
        return detail.to_string();
    }
    if let Some(email) = body.get("email").and_then(field_errors) {
        return format!("Email error: {email}");
    }

    let fields: Vec<String> = body
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(field, errors)| {
                    field_errors(errors).map(|text| format!("{}: {text}", field_label(field)))
                })
                .collect()
        })
        .unwrap_or_default();

    if fields.is_empty() {
        "Invalid data provided. Please check your input and try again.".to_string()
    } else {
        fields.join("; ")
    }
}

fn field_errors(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

/// `first_name` -> `First Name`
fn field_label(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors emitted by `QuestionnaireService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionnaireError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

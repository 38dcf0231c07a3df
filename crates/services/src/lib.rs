#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod questionnaire;

pub use api::{InMemoryQuestionnaireApi, QuestionnaireApi};
pub use auth::{AuthToken, Credentials, LoginResponse, Role, UserProfile};
pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use error::{ApiError, ConfigError, QuestionnaireError};
pub use questionnaire::QuestionnaireService;
pub use reqwest::StatusCode;

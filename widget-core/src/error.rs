use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Why a fetch cycle failed.
///
/// Missing or mistyped fields in an otherwise valid JSON payload are not
/// errors; they normalize to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The transport failed, or the body was not JSON at all.
    #[error("Network error: {message}")]
    Network { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Http { status: status.as_u16() };
        }
        Self::network(err.to_string())
    }
}

/// Invalid widget configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Refresh interval must be at least one second")]
    ZeroInterval,

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Last fetch failure, as surfaced to the host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub error: FetchError,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorInfo {
    pub fn now(error: FetchError) -> Self {
        Self { error, occurred_at: Utc::now() }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

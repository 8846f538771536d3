use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported subject type: {0}")]
    UnsupportedSubject(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Sound error: {0}")]
    Sound(String),

    #[error("Tab error: {0}")]
    Tab(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

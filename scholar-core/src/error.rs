use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScholarError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Rate limited by provider: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

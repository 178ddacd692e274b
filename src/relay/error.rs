use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The request body did not carry a `messages` sequence
    #[error("messages must be an array")]
    InvalidInput,
    /// Non-success response from the completion API, holds its raw body
    #[error("OpenAI API error: {0}")]
    Upstream(String),
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request cancelled before the upstream call completed")]
    Cancelled,
    #[error("{0}")]
    Unexpected(#[from] anyhow::Error),
}

use goose::GooseError;
use thiserror::Error;

/// Why a single request was classified as failed.
///
/// The `Display` output is used as the goose failure tag.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("created record has no `_id`")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{key} must be at least {min}")]
    TooSmall { key: &'static str, min: u64 },

    #[error("wait range is inverted: min {min_ms}ms > max {max_ms}ms")]
    WaitRange { min_ms: u64, max_ms: u64 },
}

#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Goose(#[from] GooseError),
}

use tagging_sync::SyncError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DelugeError>;

#[derive(Debug, Error)]
pub enum DelugeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected result from {method}: {result}")]
    UnexpectedResult {
        method: String,
        result: serde_json::Value,
    },

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl From<DelugeError> for SyncError {
    fn from(e: DelugeError) -> Self {
        SyncError::Remote(e.to_string())
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Failures reported by a [`TagSource`](crate::TagSource).
///
/// None of these escape the sync loop; they are logged and the loop keeps
/// polling.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote error: {0}")]
    Remote(String),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

//! Error type for `coldcase-store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Case numbers are unique per record kind. The insert is rejected and
    /// the store is left unchanged; callers must not retry.
    #[error("duplicate case number: {0}")]
    DuplicateCaseNumber(String),

    #[error("timestamp parse error: {0}")]
    Timestamp(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

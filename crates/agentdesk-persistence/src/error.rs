//! Error types for record store operations

use thiserror::Error;

/// Record store errors
///
/// A missing record is never an error: lookups return `Option` and deletes
/// return `bool`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller input failed a precondition (blank name, blank content)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Filesystem failure while reading or writing the store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while writing the index
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite backend failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

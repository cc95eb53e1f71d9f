//! Error types for agent dispatch

use thiserror::Error;

/// Agent dispatch errors. Every variant ends the invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Request rejected before any work was done
    #[error("{0}")]
    Validation(String),

    /// Backend credential missing or still the template placeholder
    #[error("{0}")]
    Configuration(String),

    /// Backend answered with a non-success status or an unexpected body
    #[error("Backend error ({}): {message}", status_label(.status))]
    Backend {
        /// HTTP status returned by the backend
        status: Option<u16>,
        /// Response body or decoding failure
        message: String,
    },

    /// Network, serialization or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}

impl AgentError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AgentError>;

//! Mapping of store and dispatcher failures to HTTP responses

use agentdesk_persistence::StoreError;
use agentdesk_provider::AgentError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

/// An error answered as `{"error": message}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(message) => Self::BadRequest(message),
            other => {
                error!("Store error: {}", other);
                Self::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::Validation(message) => Self::BadRequest(message),
            AgentError::Configuration(message) => {
                error!("Agent backend not configured: {}", message);
                Self::Internal(message)
            }
            AgentError::Backend { .. } => {
                error!("Agent backend failed: {}", e);
                Self::Internal("Failed to get response from AI".to_string())
            }
            AgentError::Internal(message) => {
                error!("Agent error: {}", message);
                Self::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        Self::bad_request("Invalid request")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        Self::bad_request("Invalid request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors() {
        let err = ApiError::from(StoreError::validation("Name is required"));
        assert_eq!(err, ApiError::bad_request("Name is required"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApiError::from(StoreError::from(io));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_agent_errors() {
        let err = ApiError::from(AgentError::Configuration(
            "Google API key not configured".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Google API key not configured");

        let err = ApiError::from(AgentError::Backend {
            status: Some(500),
            message: "boom".to_string(),
        });
        assert_eq!(err.message(), "Failed to get response from AI");

        let err = ApiError::from(AgentError::Internal("socket closed".to_string()));
        assert_eq!(err.message(), "Internal server error");

        let err = ApiError::from(AgentError::Validation("Query is required".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedibotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM request timed out after {timeout_ms} ms")]
    LlmTimeout { timeout_ms: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Coarse failure class, so callers can branch without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid settings. Fatal at startup.
    Configuration,
    /// The external text-generation service failed or timed out.
    Service,
    /// Reading from or writing to the local store failed.
    Storage,
    /// The caller sent something unusable.
    Request,
}

impl MedibotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MedibotError::Config(_) => ErrorKind::Configuration,
            MedibotError::Llm(_) | MedibotError::LlmTimeout { .. } => ErrorKind::Service,
            MedibotError::Database(_) | MedibotError::Internal(_) => ErrorKind::Storage,
            MedibotError::Validation(_) => ErrorKind::Request,
        }
    }
}

/// Webhook error body: `{"detail": "<message>"}`, always HTTP 500.
impl IntoResponse for MedibotError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Request => tracing::warn!(error = %self, "Rejected webhook request"),
            _ => tracing::error!(error = %self, kind = ?self.kind(), "Request failed"),
        }

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, MedibotError>;

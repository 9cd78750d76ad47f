//! # V1 API Response Envelope & Error Contract
//!
//! Every dashboard endpoint returns an [`ApiResponse<T>`] envelope:
//!
//! ```json
//! {
//!   "data": { ... },                                    // present on success
//!   "meta": { "total": 42 },                            // optional
//!   "error": { "code": "invalid_request", "message": "..." }  // present on error
//! }
//! ```
//!
//! The chat-platform webhook does not use this envelope; see
//! [`crate::error::MedibotError`] for its `{"detail": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, MedibotError};

/// Machine-readable error code included in every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body or failed validation. HTTP 400.
    InvalidRequest,
    /// The answer service failed or timed out. HTTP 502.
    UpstreamError,
    /// Anything else. Details are logged, never returned. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::UpstreamError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::UpstreamError => write!(f, "upstream_error"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Human-readable, shown as-is in the dashboard's error banner.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// Number of records in the store, regardless of `limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::CREATED,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<MedibotError> for ApiResponse<T> {
    fn from(err: MedibotError) -> Self {
        match (&err, err.kind()) {
            (MedibotError::Validation(msg), _) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg.clone())
            }
            (_, ErrorKind::Request) => ApiResponse::error(ErrorCode::InvalidRequest, err.to_string()),
            (_, ErrorKind::Service) => {
                tracing::error!(error = %err, "Answer service failed");
                ApiResponse::error(ErrorCode::UpstreamError, err.to_string())
            }
            (_, ErrorKind::Storage | ErrorKind::Configuration) => {
                tracing::error!(error = %err, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_serializes_without_error() {
        let resp = ApiResponse::success("hello");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], "hello");
        assert!(json.get("error").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn error_response_serializes_without_data() {
        let resp = ApiResponse::<()>::error(ErrorCode::InvalidRequest, "bad limit");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "invalid_request");
        assert_eq!(json["error"]["message"], "bad limit");
    }

    #[test]
    fn meta_total_uses_camel_case_envelope() {
        let resp = ApiResponse::success_with_meta(vec![1, 2], ResponseMeta { total: Some(7) });
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["meta"]["total"], 7);
    }

    #[test]
    fn llm_failures_become_upstream_errors() {
        let resp: ApiResponse<()> = MedibotError::LlmTimeout { timeout_ms: 4500 }.into();
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["error"]["code"], "upstream_error");
        assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn storage_failures_hide_details() {
        let resp: ApiResponse<()> = MedibotError::Internal("disk path /var/x".into()).into();
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["error"]["code"], "internal_error");
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::UpstreamError.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

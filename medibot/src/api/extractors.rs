use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::MedibotError;

/// `axum::Json` whose rejection renders as a [`MedibotError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(MedibotError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for MedibotError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> MedibotError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                MedibotError::Validation(format!("Missing required field: {field}"))
            } else {
                MedibotError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            MedibotError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            MedibotError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            MedibotError::Internal("Failed to read request body".to_string())
        }
        _ => MedibotError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`. Liveness only; neither the store nor the model is checked.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::v1::dto::{ConsultationRequest, ConsultationResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::MedibotError;

/// `POST /api/v1/consultations`
///
/// Answers from the stored dataset when a similar question exists, otherwise
/// asks the model. Whether a fresh answer is written depends on the persist
/// mode; the dashboard profile leaves it to an explicit save.
#[utoipa::path(
    post,
    path = "/api/v1/consultations",
    tag = "consultations",
    request_body = ConsultationRequest,
    responses(
        (status = 200, description = "Answer produced", body = ConsultationResponse),
        (status = 400, description = "Empty or malformed question", body = ApiError),
        (status = 502, description = "Model call failed or timed out", body = ApiError),
    )
)]
pub async fn create_consultation(
    State(state): State<AppState>,
    body: Result<Json<ConsultationRequest>, JsonRejection>,
) -> ApiResponse<ConsultationResponse> {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return MedibotError::from(rejection).into(),
    };

    match state.consultation.answer(&req.question).await {
        Ok(consultation) => ApiResponse::success(ConsultationResponse::new(
            consultation,
            state.llm.source_label(),
        )),
        Err(e) => e.into(),
    }
}

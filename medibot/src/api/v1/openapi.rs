use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Medibot Dashboard API",
        version = "1.0.0",
        description = "Medical consultation with a similarity-matched answer store.",
    ),
    paths(
        handlers::consultations::create_consultation,
        handlers::records::create_record,
        handlers::records::list_records,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        dto::ConsultationRequest,
        dto::ConsultationResponse,
        crate::models::AnswerOrigin,
        dto::CreateRecordRequest,
        dto::ListRecordsQuery,
        dto::RecordResponse,
        dto::ListRecordsResponse,
    )),
    tags(
        (name = "consultations", description = "Ask a medical question"),
        (name = "records", description = "Saved question/answer pairs"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::api::v1::dto::{
    CreateRecordRequest, ListRecordsQuery, ListRecordsResponse, RecordResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::db::QaStore;
use crate::error::MedibotError;

/// `POST /api/v1/records`
#[utoipa::path(
    post,
    path = "/api/v1/records",
    tag = "records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record saved", body = RecordResponse),
        (status = 400, description = "Blank question or answer", body = ApiError),
    )
)]
pub async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> ApiResponse<RecordResponse> {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return MedibotError::from(rejection).into(),
    };

    let record = req.into_new_record(state.llm.source_label());
    match state.consultation.save(record).await {
        Ok(saved) => ApiResponse::created(saved.into()),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/records`
///
/// Newest first.
#[utoipa::path(
    get,
    path = "/api/v1/records",
    tag = "records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Saved records", body = ListRecordsResponse),
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> ApiResponse<ListRecordsResponse> {
    let records = match state.consultation.history(query.limit).await {
        Ok(records) => records,
        Err(e) => return e.into(),
    };

    let total = match state.db.count_records().await {
        Ok(total) => total,
        Err(e) => return e.into(),
    };

    ApiResponse::success_with_meta(
        ListRecordsResponse {
            records: records.into_iter().map(Into::into).collect(),
        },
        ResponseMeta { total: Some(total) },
    )
}

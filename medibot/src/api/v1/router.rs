use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let records = Router::new().route(
        "/",
        get(handlers::records::list_records).post(handlers::records::create_record),
    );

    Router::new()
        .route(
            "/consultations",
            post(handlers::consultations::create_consultation),
        )
        .nest("/records", records)
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
}

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, PersistMode, Profile};

    async fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::for_profile(Profile::Dashboard);
        config.database.url = format!("file:{}", dir.path().join("qa.db").display());
        config.database.init_schema = true;
        config.llm.api_key = Some("test-key".to_string());
        config.llm.base_url = "http://127.0.0.1:9/v1".to_string();
        config.llm.source_label = "GPT-4".to_string();
        config.consultation.persist_mode = PersistMode::Manual;

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db: Arc<dyn crate::db::DatabaseBackend> =
            Arc::new(crate::db::LibSqlBackend::new(raw_db));
        let llm = crate::llm::LlmProvider::new(&config.llm).unwrap();

        (AppState::new(&config.consultation, db, llm), dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn openapi_json_is_valid() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'), "got: {version}");
        assert!(json["paths"].get("/api/v1/consultations").is_some());

        let schemas = &json["components"]["schemas"];
        assert_eq!(
            schemas["AnswerOrigin"]["enum"],
            serde_json::json!(["cache", "model", "fallback"])
        );
    }

    #[tokio::test]
    async fn save_then_list_round_trips_through_envelope() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/records",
                r#"{"question":"두통이 있어요","answer":"쉬세요"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["data"]["source"], "GPT-4");
        assert_eq!(created["data"]["approved"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/records?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed["meta"]["total"], 1);
        assert_eq!(listed["data"]["records"][0]["question"], "두통이 있어요");
        assert!(listed.get("error").is_none());
    }

    #[tokio::test]
    async fn blank_answer_is_invalid_request() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(post_json(
                "/api/v1/records",
                r#"{"question":"q","answer":"  "}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn malformed_body_uses_envelope() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(post_json("/api/v1/consultations", r#"{"prompt":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Missing required field: question");
    }

    #[tokio::test]
    async fn unreachable_model_is_upstream_error() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(post_json(
                "/api/v1/consultations",
                r#"{"question":"열이 나요"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "upstream_error");
    }
}

// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Once};

use serde_json::json;
use tempfile::TempDir;
use wiremock::MockServer;

use medibot::api::{create_router, AppState};
use medibot::config::{
    Config, ConsultationConfig, DatabaseConfig, LlmConfig, PersistMode, Profile, ServerConfig,
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_JOURNAL_MODE,
};
use medibot::db::{Database, DatabaseBackend, LibSqlBackend};
use medibot::llm::LlmProvider;
use medibot::services::ConsultationService;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn completion_body(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-3.5-turbo",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

pub fn api_error_body(message: &str, error_type: &str, code: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": serde_json::Value::Null,
            "code": code
        }
    })
}

pub fn llm_config(base_url: String, timeout_ms: Option<u64>) -> LlmConfig {
    LlmConfig {
        model: "gpt-3.5-turbo".to_string(),
        api_key: Some("test-key".to_string()),
        base_url,
        timeout_ms,
        temperature: 0.5,
        max_tokens: 300,
        source_label: "GPT-3.5".to_string(),
        system_prompt: medibot::llm::prompts::MEDICAL_CONSULTANT.to_string(),
    }
}

/// Build a full configuration without reading the process environment.
pub fn test_config(dir: &TempDir, server: &MockServer, persist_mode: PersistMode) -> Config {
    Config {
        profile: Profile::Webhook,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: format!("file:{}", dir.path().join("qa.db").display()),
            init_schema: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: DEFAULT_JOURNAL_MODE.to_string(),
        },
        llm: llm_config(format!("{}/v1", server.uri()), Some(4500)),
        consultation: ConsultationConfig {
            similarity_threshold: 0.8,
            persist_mode,
        },
    }
}

/// A router served on an ephemeral port, backed by a temp-file store.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub db: Arc<dyn DatabaseBackend>,
    pub consultation: ConsultationService,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn(server: &MockServer, persist_mode: PersistMode) -> Self {
        init_test_logger();

        let dir = TempDir::new().expect("temp dir");
        let config = test_config(&dir, server, persist_mode);

        let raw_db = Database::new(&config.database).await.expect("database");
        let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));
        let llm = LlmProvider::new(&config.llm).expect("llm provider");

        let state = AppState::new(&config.consultation, db.clone(), llm);
        let consultation = state.consultation.clone();
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            db,
            consultation,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn chat(&self, utterance: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chat"))
            .json(&json!({
                "userRequest": { "utterance": utterance },
                "bot": { "id": "test-bot" },
                "action": { "name": "consult" }
            }))
            .send()
            .await
            .expect("request")
    }
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;

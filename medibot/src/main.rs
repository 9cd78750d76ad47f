use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medibot::api::{create_router, AppState};
use medibot::config::{Config, Profile};
use medibot::db::{Database, DatabaseBackend, LibSqlBackend};
use medibot::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "medibot")]
#[command(about = "Medical consultation chatbot with a similarity-matched answer store")]
struct Args {
    /// Deployment profile: `webhook` or `dashboard`
    #[arg(long)]
    profile: Option<Profile>,

    /// Port to listen on, overriding MEDIBOT_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Assume `qa_dataset` already exists instead of creating it
    #[arg(long)]
    skip_schema_init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medibot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(args.profile)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.skip_schema_init {
        config.database.init_schema = false;
    }

    tracing::info!(
        profile = %config.profile,
        persist_mode = %config.consultation.persist_mode,
        threshold = config.consultation.similarity_threshold,
        "Loaded configuration"
    );

    tracing::info!("Initializing database at {}...", config.database.url);
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if !config.database.init_schema && !db.has_qa_table().await? {
        tracing::warn!(
            "Schema creation skipped and qa_dataset does not exist; requests will fail until it is created"
        );
    }

    tracing::info!("Initializing LLM provider: {}...", config.llm.model);
    let llm = LlmProvider::new(&config.llm)?;

    let state = AppState::new(&config.consultation, db, llm);
    let consultation = state.consultation.clone();
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Medibot starting on http://{}", addr);
    tracing::info!("  Webhook:      http://{}/api/chat", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  Dashboard:    http://{}/", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Waiting for pending background writes...");
    consultation.wait_for_pending_writes().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

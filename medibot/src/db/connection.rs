use libsql::{Builder, Connection};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Handle to the single-file store. Each operation opens its own
/// connection through [`Database::connect`] and drops it when done.
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    pub(crate) busy_timeout_ms: u64,
    pub(crate) journal_mode: String,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
        let db = Builder::new_local(path).build().await?;

        let database = Self {
            db: Arc::new(db),
            busy_timeout_ms: config.busy_timeout_ms,
            journal_mode: normalize_journal_mode(&config.journal_mode).to_string(),
        };
        database.configure_database().await?;

        if config.init_schema {
            database.init_schema().await?;
        }

        Ok(database)
    }

    /// Open a connection with the busy timeout applied. The timeout is
    /// per-connection in SQLite, so it is set on every one.
    pub fn connect(&self) -> Result<Connection> {
        let conn = self.db.connect()?;
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        Ok(conn)
    }

    /// Journal mode is stored in the database file, so setting it once is enough.
    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect()?;

        let journal_sql = format!("PRAGMA journal_mode = {}", self.journal_mode);
        if let Err(error) = conn.execute_batch(&journal_sql).await {
            tracing::warn!(
                mode = %self.journal_mode,
                error = %error,
                "Failed to set SQLite journal_mode"
            );
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode.clone(),
        }
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "WAL" => "WAL",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

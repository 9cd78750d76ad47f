use libsql::Connection;

use crate::error::Result;

/// Column layout matches databases created by earlier deployments, so an
/// existing `qa.db` can be opened as-is.
pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS qa_dataset (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            source TEXT NOT NULL,
            approved BOOLEAN DEFAULT FALSE,
            tags TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_qa_dataset_created_at ON qa_dataset(created_at);
        "#,
    )
    .await?;

    Ok(())
}

pub async fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut rows = conn
        .query(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            libsql::params![table],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

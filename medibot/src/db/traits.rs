use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewQaRecord, QaPair, QaRecord};

/// Append-only storage for question/answer records.
#[async_trait]
pub trait QaStore: Send + Sync {
    async fn insert_record(&self, record: &NewQaRecord) -> Result<QaRecord>;
    async fn get_record(&self, id: i64) -> Result<Option<QaRecord>>;

    /// All stored questions with their answers, ascending by id.
    async fn list_qa_pairs(&self) -> Result<Vec<QaPair>>;

    /// Records newest first, optionally capped at `limit`.
    async fn list_recent(&self, limit: Option<u32>) -> Result<Vec<QaRecord>>;
    async fn count_records(&self) -> Result<u64>;
}

/// A complete database backend: record storage plus lifecycle checks.
#[async_trait]
pub trait DatabaseBackend: QaStore {
    /// Whether `qa_dataset` exists. Used when schema creation is skipped.
    async fn has_qa_table(&self) -> Result<bool>;
}

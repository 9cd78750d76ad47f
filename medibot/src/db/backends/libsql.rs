use crate::db::connection::Database;
use crate::db::repository::QaRecordRepository;
use crate::db::schema;
use crate::db::traits::{DatabaseBackend, QaStore};
use crate::error::Result;
use crate::models::{NewQaRecord, QaPair, QaRecord};
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QaStore for LibSqlBackend {
    async fn insert_record(&self, record: &NewQaRecord) -> Result<QaRecord> {
        let conn = self.db.connect()?;
        QaRecordRepository::create(&conn, record).await
    }
    async fn get_record(&self, id: i64) -> Result<Option<QaRecord>> {
        let conn = self.db.connect()?;
        QaRecordRepository::get_by_id(&conn, id).await
    }
    async fn list_qa_pairs(&self) -> Result<Vec<QaPair>> {
        let conn = self.db.connect()?;
        QaRecordRepository::list_pairs(&conn).await
    }
    async fn list_recent(&self, limit: Option<u32>) -> Result<Vec<QaRecord>> {
        let conn = self.db.connect()?;
        QaRecordRepository::list_recent(&conn, limit).await
    }
    async fn count_records(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        QaRecordRepository::count(&conn).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn has_qa_table(&self) -> Result<bool> {
        let conn = self.db.connect()?;
        schema::table_exists(&conn, "qa_dataset").await
    }
}

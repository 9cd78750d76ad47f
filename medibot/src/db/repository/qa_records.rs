use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::{params, Connection};

use crate::error::{MedibotError, Result};
use crate::models::{NewQaRecord, QaPair, QaRecord};

/// `CURRENT_TIMESTAMP` layout; new rows use it too so text ordering stays consistent.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct QaRecordRepository;

impl QaRecordRepository {
    pub async fn create(conn: &Connection, record: &NewQaRecord) -> Result<QaRecord> {
        record.validate()?;

        let created_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        conn.execute(
            r#"
            INSERT INTO qa_dataset (
                question, answer, source, approved, tags, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6
            )
            "#,
            params![
                record.question.as_str(),
                record.answer.as_str(),
                record.source.as_str(),
                record.approved as i64,
                record.tags.as_deref(),
                created_at.as_str(),
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();

        Ok(QaRecord {
            id,
            question: record.question.clone(),
            answer: record.answer.clone(),
            source: record.source.clone(),
            approved: record.approved,
            tags: record.tags.clone(),
            created_at: parse_timestamp(&created_at)?,
        })
    }

    pub async fn get_by_id(conn: &Connection, id: i64) -> Result<Option<QaRecord>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, question, answer, source, approved, tags, created_at
                FROM qa_dataset
                WHERE id = ?1
                "#,
                params![id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Every stored question and answer, oldest id first.
    pub async fn list_pairs(conn: &Connection) -> Result<Vec<QaPair>> {
        let mut rows = conn
            .query(
                "SELECT id, question, answer FROM qa_dataset ORDER BY id ASC",
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(QaPair {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
            });
        }

        Ok(results)
    }

    /// Records newest first. `None` returns all of them.
    pub async fn list_recent(conn: &Connection, limit: Option<u32>) -> Result<Vec<QaRecord>> {
        let limit = limit.map(i64::from).unwrap_or(-1);

        let mut rows = conn
            .query(
                r#"
                SELECT id, question, answer, source, approved, tags, created_at
                FROM qa_dataset
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
                "#,
                params![limit],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_record(&row)?);
        }

        Ok(results)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM qa_dataset", ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| MedibotError::Internal("COUNT(*) returned no row".to_string()))?;
        let count: i64 = row.get(0)?;
        Ok(count.max(0) as u64)
    }

    fn row_to_record(row: &libsql::Row) -> Result<QaRecord> {
        let id: i64 = row.get(0)?;
        let approved: Option<i64> = row.get(4)?;
        let created_at: Option<String> = row.get(6)?;
        let created_at = created_at.ok_or_else(|| {
            MedibotError::Internal(format!("qa_dataset row {id} has no created_at"))
        })?;
        let created_at = parse_timestamp(&created_at).map_err(|_| {
            MedibotError::Internal(format!(
                "qa_dataset row {id} has unparseable created_at {created_at:?}"
            ))
        })?;

        Ok(QaRecord {
            id,
            question: row.get(1)?,
            answer: row.get(2)?,
            source: row.get(3)?,
            approved: approved.unwrap_or(0) != 0,
            tags: row.get(5)?,
            created_at,
        })
    }
}

/// Accepts both `CURRENT_TIMESTAMP` text and RFC 3339.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(MedibotError::Internal(format!("unparseable timestamp {value:?}")))
}

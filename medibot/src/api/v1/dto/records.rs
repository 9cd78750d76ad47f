use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{NewQaRecord, QaRecord};

/// Request body for `POST /api/v1/records`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub question: String,
    pub answer: String,
    /// Provenance label. Defaults to the active model's label.
    pub source: Option<String>,
    /// Defaults to `true`.
    pub approved: Option<bool>,
    pub tags: Option<String>,
}

impl CreateRecordRequest {
    pub fn into_new_record(self, default_source: &str) -> NewQaRecord {
        NewQaRecord {
            question: self.question,
            answer: self.answer,
            source: self
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default_source.to_string()),
            approved: self.approved.unwrap_or(true),
            tags: self.tags,
        }
    }
}

/// Query parameters for `GET /api/v1/records`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct ListRecordsQuery {
    /// Maximum records to return. Omit for all.
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub source: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<QaRecord> for RecordResponse {
    fn from(record: QaRecord) -> Self {
        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            source: record.source,
            approved: record.approved,
            tags: record.tags,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListRecordsResponse {
    pub records: Vec<RecordResponse>,
}

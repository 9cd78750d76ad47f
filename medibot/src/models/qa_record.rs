use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MedibotError, Result};

/// One stored question/answer pair with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub source: String,
    pub approved: bool,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A record about to be inserted. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewQaRecord {
    pub question: String,
    pub answer: String,
    pub source: String,
    pub approved: bool,
    pub tags: Option<String>,
}

impl NewQaRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source: source.into(),
            approved: true,
            tags: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(MedibotError::Validation(
                "Question cannot be empty".to_string(),
            ));
        }
        if self.answer.trim().is_empty() {
            return Err(MedibotError::Validation("Answer cannot be empty".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(MedibotError::Validation("Source cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// The slice of a record the cache lookup needs.
#[derive(Debug, Clone, PartialEq)]
pub struct QaPair {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// Where a consultation answer came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    /// A stored answer to a sufficiently similar question.
    Cache,
    /// A fresh completion from the model.
    Model,
    /// The model returned nothing; a placeholder was substituted.
    Fallback,
}

impl std::fmt::Display for AnswerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Model => write!(f, "model"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Consultation {
    pub answer: String,
    pub origin: AnswerOrigin,
    /// Stored question that produced a cache hit.
    pub matched_question: Option<String>,
    /// Id of the record written for this answer, when written inline.
    pub record_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_defaults_to_approved() {
        let record = NewQaRecord::new("q", "a", "GPT-3.5");
        assert!(record.approved);
        assert!(record.tags.is_none());
    }

    #[test]
    fn blank_fields_fail_validation() {
        assert!(NewQaRecord::new(" ", "a", "GPT-4").validate().is_err());
        assert!(NewQaRecord::new("q", "\n", "GPT-4").validate().is_err());
        assert!(NewQaRecord::new("q", "a", "").validate().is_err());
        assert!(NewQaRecord::new("q", "a", "GPT-4").validate().is_ok());
    }

    #[test]
    fn origin_serializes_snake_case() {
        let json = serde_json::to_value(AnswerOrigin::Cache).unwrap();
        assert_eq!(json, "cache");
        assert_eq!(AnswerOrigin::Fallback.to_string(), "fallback");
    }
}

use serde::{Deserialize, Serialize};

use crate::models::{AnswerOrigin, Consultation};

/// Request body for `POST /api/v1/consultations`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    /// The patient's question, as typed.
    pub question: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub answer: String,
    pub origin: AnswerOrigin,
    /// Stored question the answer was taken from, on a cache hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    /// Label to pass back when saving this answer.
    pub source: String,
}

impl ConsultationResponse {
    pub fn new(consultation: Consultation, source: &str) -> Self {
        Self {
            answer: consultation.answer,
            origin: consultation.origin,
            matched_question: consultation.matched_question,
            record_id: consultation.record_id,
            source: source.to_string(),
        }
    }
}

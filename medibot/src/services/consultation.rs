use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::config::{ConsultationConfig, PersistMode};
use crate::db::{DatabaseBackend, QaStore};
use crate::error::{MedibotError, Result};
use crate::llm::prompts::EMPTY_ANSWER_FALLBACK;
use crate::llm::LlmProvider;
use crate::models::{AnswerOrigin, Consultation, NewQaRecord, QaPair, QaRecord};
use crate::search::find_similar;

/// Answers medical questions from the stored dataset when a close enough
/// question was already asked, and from the model otherwise.
#[derive(Clone)]
pub struct ConsultationService {
    db: Arc<dyn DatabaseBackend>,
    llm: LlmProvider,
    threshold: f64,
    persist_mode: PersistMode,
    writes: TaskTracker,
}

impl ConsultationService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        llm: LlmProvider,
        config: &ConsultationConfig,
    ) -> Self {
        Self {
            db,
            llm,
            threshold: config.similarity_threshold,
            persist_mode: config.persist_mode,
            writes: TaskTracker::new(),
        }
    }

    /// Earliest stored pair whose question scores above the threshold.
    pub async fn lookup(&self, question: &str) -> Result<Option<QaPair>> {
        let pairs = self.db.list_qa_pairs().await?;
        Ok(find_similar(question, &pairs, self.threshold).cloned())
    }

    pub async fn answer(&self, question: &str) -> Result<Consultation> {
        if question.trim().is_empty() {
            return Err(MedibotError::Validation(
                "Question cannot be empty".to_string(),
            ));
        }

        if let Some(hit) = self.lookup(question).await? {
            tracing::info!(record_id = hit.id, "Answered from stored dataset");
            return Ok(Consultation {
                answer: hit.answer,
                origin: AnswerOrigin::Cache,
                matched_question: Some(hit.question),
                record_id: Some(hit.id),
            });
        }

        tracing::info!(model = %self.llm.model(), "No stored match, asking the model");

        let Some(answer) = self.llm.consult(question).await? else {
            tracing::warn!(model = %self.llm.model(), "Model returned an empty answer");
            return Ok(Consultation {
                answer: EMPTY_ANSWER_FALLBACK.to_string(),
                origin: AnswerOrigin::Fallback,
                matched_question: None,
                record_id: None,
            });
        };

        let record = NewQaRecord::new(question, answer.as_str(), self.llm.source_label());
        let record_id = match self.persist_mode {
            PersistMode::Inline => Some(self.db.insert_record(&record).await?.id),
            PersistMode::Background => {
                self.spawn_write(record);
                None
            }
            PersistMode::Manual => None,
        };

        Ok(Consultation {
            answer,
            origin: AnswerOrigin::Model,
            matched_question: None,
            record_id,
        })
    }

    /// Store a question/answer pair on explicit request.
    pub async fn save(&self, record: NewQaRecord) -> Result<QaRecord> {
        let saved = self.db.insert_record(&record).await?;
        tracing::info!(record_id = saved.id, source = %saved.source, "Saved record");
        Ok(saved)
    }

    pub async fn history(&self, limit: Option<u32>) -> Result<Vec<QaRecord>> {
        self.db.list_recent(limit).await
    }

    /// Block until every background write spawned so far has finished.
    pub async fn wait_for_pending_writes(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }

    fn spawn_write(&self, record: NewQaRecord) {
        let db = Arc::clone(&self.db);
        self.writes.spawn(async move {
            match db.insert_record(&record).await {
                Ok(saved) => tracing::debug!(record_id = saved.id, "Background write complete"),
                Err(error) => tracing::error!(error = %error, "Background write failed"),
            }
        });
    }
}

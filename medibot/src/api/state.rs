use std::sync::Arc;

use crate::config::ConsultationConfig;
use crate::db::DatabaseBackend;
use crate::llm::LlmProvider;
use crate::services::ConsultationService;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseBackend>,
    pub llm: LlmProvider,
    pub consultation: ConsultationService,
}

impl AppState {
    pub fn new(
        consultation: &ConsultationConfig,
        db: Arc<dyn DatabaseBackend>,
        llm: LlmProvider,
    ) -> Self {
        let consultation = ConsultationService::new(db.clone(), llm.clone(), consultation);

        Self {
            db,
            llm,
            consultation,
        }
    }
}

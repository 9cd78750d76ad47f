use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// The hosted model, configured once at startup and shared by handle.
#[derive(Clone)]
pub struct LlmProvider {
    client: LlmApiClient,
    config: Arc<LlmConfig>,
    options: CompletionOptions,
}

impl LlmProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = LlmApiClient::new(config)?;
        let options = CompletionOptions {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        };

        Ok(Self {
            client,
            config: Arc::new(config.clone()),
            options,
        })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Label stored in `qa_dataset.source` for answers from this model.
    pub fn source_label(&self) -> &str {
        &self.config.source_label
    }

    /// Ask the model one medical question, statelessly, under the fixed
    /// system prompt. `Ok(None)` means the model produced no text.
    pub async fn consult(&self, question: &str) -> Result<Option<String>> {
        tracing::debug!(model = %self.model(), question_len = question.len(), "Calling LLM");
        self.client
            .complete(
                question,
                Some(&self.config.system_prompt),
                Some(&self.options),
            )
            .await
    }
}

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::LlmConfig,
    error::{MedibotError, Result},
    llm::provider::CompletionOptions,
};

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    model: String,
    timeout_ms: Option<u64>,
}

/// Thin wrapper over an OpenAI-compatible chat-completions endpoint.
///
/// Issues exactly one request per call. Nothing is retried: async-openai's
/// internal backoff is given a zero budget.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| MedibotError::Config("API key required for the LLM".to_string()))?;

        let api_config = ApiConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_ms: config.timeout_ms,
        };

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_key);

        let mut http_client = reqwest::Client::builder();
        if let Some(timeout_ms) = api_config.timeout_ms {
            http_client = http_client.timeout(Duration::from_millis(timeout_ms));
        }
        let http_client = http_client.build().map_err(|error| {
            MedibotError::Config(format!("Failed to create LLM HTTP client: {error}"))
        })?;

        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Request a single completion. `Ok(None)` means the model answered with
    /// empty or null content.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<Option<String>> {
        if prompt.trim().is_empty() {
            return Err(MedibotError::Validation(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let request = self.build_request(prompt, system_prompt, options)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => Err(self.map_openai_error(error)),
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        MedibotError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| MedibotError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.config.model.clone()).messages(messages).n(1);
        Self::apply_completion_options(&mut request, options);

        request.build().map_err(|error| {
            MedibotError::Validation(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn apply_completion_options(
        request: &mut CreateChatCompletionRequestArgs,
        options: Option<&CompletionOptions>,
    ) {
        let Some(options) = options else {
            return;
        };

        if let Some(temperature) = options.temperature {
            request.temperature(temperature);
        }

        if let Some(max_tokens) = options.max_tokens {
            #[allow(deprecated)]
            request.max_tokens(max_tokens);
        }
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<Option<String>> {
        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| MedibotError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content;

        Ok(content.filter(|text| !text.trim().is_empty()))
    }

    fn map_openai_error(&self, error: OpenAIError) -> MedibotError {
        match error {
            OpenAIError::Reqwest(reqwest_error) if reqwest_error.is_timeout() => {
                MedibotError::LlmTimeout {
                    timeout_ms: self.config.timeout_ms.unwrap_or_default(),
                }
            }
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                MedibotError::Llm(format!("LLM authentication failed: {reqwest_error}"))
            }
            OpenAIError::Reqwest(reqwest_error) => {
                MedibotError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(&api_error) => {
                MedibotError::Llm(format!("LLM authentication failed: {api_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                MedibotError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                MedibotError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => MedibotError::Validation(message),
            other => MedibotError::Llm(other.to_string()),
        }
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("invalid api key")
            || message.contains("incorrect api key")
            || code.contains("invalid_api_key")
            || error_type.contains("authentication")
    }
}

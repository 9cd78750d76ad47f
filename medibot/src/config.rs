use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{MedibotError, Result};
use crate::llm::prompts;

fn parse_env_or<T: FromStr>(var: &str, default: T) -> T
where
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Which of the two deployments this process behaves like.
///
/// `Webhook` answers the chat-platform skill endpoint quickly and writes in the
/// background; `Dashboard` favours longer answers and only saves on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Webhook,
    Dashboard,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => write!(f, "webhook"),
            Self::Dashboard => write!(f, "dashboard"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webhook" | "api" => Ok(Self::Webhook),
            "dashboard" | "ui" => Ok(Self::Dashboard),
            _ => Err(format!("Unknown profile: {s}")),
        }
    }
}

/// When a freshly generated answer is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Spawned after the answer is produced; the caller never waits on it.
    Background,
    /// Awaited before the answer is returned.
    Inline,
    /// Never written automatically; only an explicit save stores it.
    Manual,
}

impl fmt::Display for PersistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Inline => write!(f, "inline"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for PersistMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "background" => Ok(Self::Background),
            "inline" => Ok(Self::Inline),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown persist mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub profile: Profile,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub consultation: ConsultationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Create `qa_dataset` on startup if it does not exist.
    pub init_schema: bool,
    /// Applied to every connection handed out by the store.
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
}

/// Chat-completion settings for the hosted model.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// `None` leaves the request unbounded.
    pub timeout_ms: Option<u64>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Written to `qa_dataset.source` for every generated answer.
    pub source_label: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationConfig {
    pub similarity_threshold: f64,
    pub persist_mode: PersistMode,
}

struct ProfileDefaults {
    model: &'static str,
    source_label: &'static str,
    temperature: f32,
    max_tokens: u32,
    timeout_ms: u64,
    system_prompt: &'static str,
    persist_mode: PersistMode,
}

impl Profile {
    fn defaults(self) -> ProfileDefaults {
        match self {
            Profile::Webhook => ProfileDefaults {
                model: "gpt-3.5-turbo",
                source_label: "GPT-3.5",
                temperature: 0.5,
                max_tokens: 300,
                timeout_ms: 4500,
                system_prompt: prompts::MEDICAL_CONSULTANT,
                persist_mode: PersistMode::Background,
            },
            Profile::Dashboard => ProfileDefaults {
                model: "gpt-4",
                source_label: "GPT-4",
                temperature: 0.7,
                max_tokens: 1000,
                timeout_ms: 0,
                system_prompt: prompts::MEDICAL_CONSULTANT_KOREAN,
                persist_mode: PersistMode::Manual,
            },
        }
    }
}

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_JOURNAL_MODE: &str = "WAL";

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(parse_env_or("MEDIBOT_PROFILE", Profile::Webhook))
    }
}

impl Config {
    /// Build a configuration from the environment, filling unset values from
    /// the profile. Does not validate.
    pub fn for_profile(profile: Profile) -> Self {
        let defaults = profile.defaults();
        let timeout_ms: u64 = parse_env_or("LLM_TIMEOUT_MS", defaults.timeout_ms);

        Self {
            profile,
            server: ServerConfig {
                host: env::var("MEDIBOT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("MEDIBOT_PORT", 8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:qa.db".to_string()),
                init_schema: parse_env_or("DATABASE_INIT_SCHEMA", true),
                busy_timeout_ms: parse_env_or(
                    "DATABASE_BUSY_TIMEOUT_MS",
                    DEFAULT_BUSY_TIMEOUT_MS,
                ),
                journal_mode: env_non_empty("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|| DEFAULT_JOURNAL_MODE.to_string()),
            },
            llm: LlmConfig {
                model: env_non_empty("LLM_MODEL").unwrap_or_else(|| defaults.model.to_string()),
                api_key: env_non_empty("OPENAI_API_KEY"),
                base_url: env_non_empty("LLM_BASE_URL")
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                timeout_ms: (timeout_ms > 0).then_some(timeout_ms),
                temperature: parse_env_or("LLM_TEMPERATURE", defaults.temperature),
                max_tokens: parse_env_or("LLM_MAX_TOKENS", defaults.max_tokens),
                source_label: env_non_empty("LLM_SOURCE_LABEL")
                    .unwrap_or_else(|| defaults.source_label.to_string()),
                system_prompt: env_non_empty("LLM_SYSTEM_PROMPT")
                    .unwrap_or_else(|| defaults.system_prompt.to_string()),
            },
            consultation: ConsultationConfig {
                similarity_threshold: parse_env_or(
                    "SIMILARITY_THRESHOLD",
                    DEFAULT_SIMILARITY_THRESHOLD,
                ),
                persist_mode: parse_env_or("PERSIST_MODE", defaults.persist_mode),
            },
        }
    }

    /// Load and validate. `profile` overrides `MEDIBOT_PROFILE` when given.
    pub fn load(profile: Option<Profile>) -> Result<Self> {
        let profile =
            profile.unwrap_or_else(|| parse_env_or("MEDIBOT_PROFILE", Profile::Webhook));
        let config = Self::for_profile(profile);
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_none() {
            return Err(MedibotError::Config(
                "OPENAI_API_KEY is not set. Check your environment or .env file.".to_string(),
            ));
        }

        let threshold = self.consultation.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MedibotError::Config(format!(
                "SIMILARITY_THRESHOLD must be within 0.0..=1.0, got {threshold}"
            )));
        }

        if self.llm.max_tokens == 0 {
            return Err(MedibotError::Config(
                "LLM_MAX_TOKENS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Assistant configuration from the environment

use crate::error::{AssistantError, Result};

const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8000";
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

fn default_max_iterations() -> usize {
    10
}

/// Configuration for the assistant agent loop
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Base URL of the Storepulse API the tools call
    pub backend_api_url: String,

    /// API key for the chat-completions endpoint
    pub api_key: String,

    /// Chat-completions endpoint (any OpenAI-compatible API)
    pub api_url: String,

    /// Model identifier
    pub model: String,

    /// Maximum number of tool-calling iterations per user turn
    pub max_iterations: usize,
}

impl AssistantConfig {
    /// Load configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AssistantError::config("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            backend_api_url: std::env::var("BACKEND_API_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_API_URL.to_string()),
            api_key,
            api_url: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            model: std::env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_iterations: default_max_iterations(),
        })
    }

    pub fn new(backend_api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            backend_api_url: backend_api_url.into(),
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_iterations: default_max_iterations(),
        }
    }

    /// Set a custom chat-completions endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

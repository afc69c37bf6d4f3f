//! Groq LLM client

use std::time::Duration;

use secrecy::SecretString;
use scholar_core::{LlmRequest, LlmResponse, Runnable, ScholarError};

use crate::openai_compatible::OpenAiCompatibleClient;
use crate::ModelConfig;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Groq chat completions client
#[derive(Clone)]
pub struct GroqClient(OpenAiCompatibleClient);

impl GroqClient {
    /// Create a new Groq client with the given API key and default settings
    pub fn new(api_key: SecretString) -> Result<Self, ScholarError> {
        Self::from_config(&ModelConfig::new(api_key))
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self, ScholarError> {
        let client = OpenAiCompatibleClient::builder()
            .base_url(&config.base_url)?
            .api_key_secret(config.api_key.clone())
            .default_model(config.model_name.clone())
            .temperature(config.temperature)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self(client))
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.0.set_default_model(model);
        self
    }

    pub fn model(&self) -> &str {
        self.0.default_model()
    }

    pub(crate) fn default_timeout() -> Duration {
        Duration::from_secs(120)
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for GroqClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScholarError> {
        self.0.invoke(input).await
    }
}

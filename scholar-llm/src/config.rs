use std::time::Duration;

use secrecy::SecretString;
use scholar_core::{RetryPolicy, ScholarError, Throttled};

use crate::providers::groq::{GroqClient, GROQ_BASE_URL, GROQ_DEFAULT_MODEL};

/// The model client every component of a run shares: Groq behind the
/// pacing and cooldown schedule of [`RetryPolicy`].
pub type RateLimitedClient = Throttled<GroqClient>;

/// Connection and retry settings for the shared model client.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub model_name: String,
    pub api_key: SecretString,
    pub base_url: String,
    pub temperature: f32,
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub delay_step: Duration,
    pub cooldown_delay: Duration,
    pub cooldown_step: Duration,
    pub request_timeout: Duration,
}

impl ModelConfig {
    pub fn new(api_key: SecretString) -> Self {
        let policy = RetryPolicy::default();
        Self {
            model_name: GROQ_DEFAULT_MODEL.to_string(),
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
            temperature: 0.0,
            max_attempts: policy.max_attempts,
            base_delay: policy.base_delay,
            delay_step: policy.delay_step,
            cooldown_delay: policy.cooldown_delay,
            cooldown_step: policy.cooldown_step,
            request_timeout: GroqClient::default_timeout(),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.max_attempts = policy.max_attempts;
        self.base_delay = policy.base_delay;
        self.delay_step = policy.delay_step;
        self.cooldown_delay = policy.cooldown_delay;
        self.cooldown_step = policy.cooldown_step;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            delay_step: self.delay_step,
            cooldown_delay: self.cooldown_delay,
            cooldown_step: self.cooldown_step,
        }
    }

    pub fn build_client(&self) -> Result<GroqClient, ScholarError> {
        GroqClient::from_config(self)
    }

    pub fn build_rate_limited(&self) -> Result<RateLimitedClient, ScholarError> {
        Ok(Throttled::new(self.build_client()?, self.retry_policy()))
    }
}

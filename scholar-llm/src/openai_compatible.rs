//! Generic OpenAI-compatible LLM client
//!
//! Supports any provider using OpenAI's chat completions format (Groq, OpenAI,
//! Together, local gateways). Only plain text completions are used.

use std::time::Duration;

use reqwest::{header::HeaderMap, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use scholar_core::{LlmRequest, LlmResponse, Message, Runnable, ScholarError};

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    pub stream: bool,
}

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
    default_model: String,
    temperature: Option<f32>,
    timeout: Duration,
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn set_default_model(&mut self, model: impl Into<String>) {
        self.default_model = model.into();
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn build_request(&self, input: LlmRequest) -> ChatCompletionRequest {
        let LlmRequest {
            model,
            messages,
            temperature,
            stop,
        } = input;
        ChatCompletionRequest {
            model: if model.is_empty() {
                self.default_model.clone()
            } else {
                model
            },
            messages,
            temperature: temperature.or(self.temperature),
            max_tokens: None,
            stop: if stop.is_empty() { None } else { Some(stop) },
            stream: false,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ScholarError {
        if err.is_timeout() {
            ScholarError::Timeout(self.timeout)
        } else {
            ScholarError::LlmProvider(err.to_string())
        }
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let body = body.trim();
            if body.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                body.to_string()
            }
        })
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OpenAiCompatibleClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScholarError> {
        let request = self.build_request(input);
        debug!(model = %request.model, messages = request.messages.len(), "chat completion request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(ScholarError::RateLimited {
                message: error_message(status, &body),
                retry_after,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScholarError::LlmProvider(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(status, &body)
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        let response: ChatCompletionResponse = serde_json::from_str(&body)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScholarError::LlmProvider("no choices returned".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
        })
    }
}

pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    default_model: Option<String>,
    temperature: Option<f32>,
    timeout: Duration,
}

impl Default for OpenAiCompatibleBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_model: None,
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ScholarError> {
        let url = Url::parse(base_url.as_ref())
            .map_err(|err| ScholarError::InvalidConfig(format!("invalid base url: {err}")))?;
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    pub fn api_key_secret(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, ScholarError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ScholarError::InvalidConfig("base url is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| ScholarError::MissingCredential("api key".to_string()))?;
        if api_key.expose_secret().trim().is_empty() {
            return Err(ScholarError::MissingCredential("api key is empty".to_string()));
        }
        let default_model = self
            .default_model
            .ok_or_else(|| ScholarError::InvalidConfig("default model is required".to_string()))?;

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| ScholarError::InvalidConfig(err.to_string()))?;

        Ok(OpenAiCompatibleClient {
            http,
            base_url,
            api_key,
            default_model,
            temperature: self.temperature,
            timeout: self.timeout,
        })
    }
}

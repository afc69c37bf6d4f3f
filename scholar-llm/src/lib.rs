mod config;

// OpenAI-compatible client (always available)
pub mod openai_compatible;

// Provider-specific clients
pub mod providers;

pub use config::{ModelConfig, RateLimitedClient};
pub use scholar_core::{Llm, LlmRequest, LlmResponse, Message, Role};

pub use openai_compatible::{
    ChatCompletionRequest, OpenAiCompatibleBuilder, OpenAiCompatibleClient,
};
pub use providers::groq::GroqClient;

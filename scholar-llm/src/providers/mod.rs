//! Provider-specific LLM clients

pub mod groq;

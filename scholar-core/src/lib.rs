mod error;
mod llm;
mod react;
pub mod retry;
mod runnable;
mod tool;

pub use error::ScholarError;
pub use llm::{Llm, LlmRequest, LlmResponse, Message, Role};
pub use react::{ReActStep, Transcript};
pub use retry::{RetryClass, RetryPolicy, Throttled};
pub use runnable::Runnable;
pub use tool::{Tool, ToolError};

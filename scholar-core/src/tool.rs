use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A capability the agent can name in an `Action:` line.
///
/// Input and output are plain text. Expected failures (network errors,
/// throttling) should be reported in the returned string so the agent can
/// reason about them; `Err` is reserved for faults the tool cannot describe
/// itself, and the tool set folds those into an observation too.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

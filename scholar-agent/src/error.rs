use scholar_core::ScholarError;

/// Conditions that abort a run. Tool failures and malformed model output are
/// never errors; they become observations.
#[derive(Debug)]
pub enum AgentError {
    ModelTransport { step_id: u32, source: ScholarError },
    PromptRender { source: ScholarError },
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentError::ModelTransport { step_id, source } => {
                write!(f, "Model transport failed at step {step_id}: {source}")
            }
            AgentError::PromptRender { source } => write!(f, "Prompt render failed: {source}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::ModelTransport { source, .. } | AgentError::PromptRender { source } => {
                Some(source)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolDispatchError {
    UnknownTool {
        name: String,
        available: Vec<String>,
    },
}

impl std::fmt::Display for ToolDispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolDispatchError::UnknownTool { name, available } => write!(
                f,
                "{name} is not a valid tool, try one of [{}].",
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for ToolDispatchError {}

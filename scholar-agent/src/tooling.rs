use std::collections::{BTreeMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use scholar_core::Tool;
use tracing::warn;

use crate::error::ToolDispatchError;

/// Named tools the agent may call, fixed once built.
#[derive(Clone)]
pub struct ToolSet {
    entries: Vec<ToolMetadata>,
    dispatchers: BTreeMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("entries", &self.entries)
            .field("dispatchers_len", &self.dispatchers.len())
            .finish()
    }
}

impl ToolSet {
    #[allow(
        clippy::new_ret_no_self,
        reason = "ToolSet::new intentionally starts a builder-first registration API"
    )]
    pub fn new() -> ToolSetBuilder {
        ToolSetBuilder {
            tools: Vec::new(),
        }
    }

    /// Registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// One `name: description` line per tool, for the reasoning prompt.
    pub fn catalog(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}: {}", entry.name, entry.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dispatchers.contains_key(name)
    }

    /// Runs `name` on `input`. Anything the tool itself does wrong, including
    /// returning `Err` or panicking, comes back as observation text; only an
    /// unregistered name is an error.
    pub async fn dispatch(&self, name: &str, input: &str) -> Result<String, ToolDispatchError> {
        let Some(tool) = self.dispatchers.get(name) else {
            return Err(ToolDispatchError::UnknownTool {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            });
        };

        let outcome = AssertUnwindSafe(tool.invoke(input)).catch_unwind().await;
        let observation = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(tool = name, error = %err, "tool returned an error");
                format!("Tool {name} failed: {err}")
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(tool = name, reason = %reason, "tool panicked");
                format!("Tool {name} failed unexpectedly: {reason}")
            }
        };
        Ok(observation)
    }
}

#[derive(Clone, Default)]
pub struct ToolSetBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSetBuilder {
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn register_all(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn build(self) -> Result<ToolSet, ToolSetBuildError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.tools.len());
        let mut dispatchers = BTreeMap::new();

        for tool in self.tools {
            let name = tool.name().to_string();
            if name.trim().is_empty() || name != name.trim() {
                return Err(ToolSetBuildError::InvalidName { name });
            }

            if !seen.insert(name.clone()) {
                return Err(ToolSetBuildError::DuplicateName { name });
            }

            entries.push(ToolMetadata {
                name: name.clone(),
                description: tool.description().to_string(),
            });
            dispatchers.insert(name, tool);
        }

        Ok(ToolSet {
            entries,
            dispatchers,
        })
    }
}

#[derive(Clone, Debug)]
struct ToolMetadata {
    name: String,
    description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolSetBuildError {
    InvalidName { name: String },
    DuplicateName { name: String },
}

impl std::fmt::Display for ToolSetBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolSetBuildError::InvalidName { name } => {
                write!(f, "tool name must not be empty or padded with whitespace: {name:?}")
            }
            ToolSetBuildError::DuplicateName { name } => {
                write!(f, "duplicate tool name: {name}")
            }
        }
    }
}

impl std::error::Error for ToolSetBuildError {}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use scholar_agent::{
    AgentError, AgentExecutor, AgentResult, RunSummary, ToolSet, ToolSetBuildError,
};
use scholar_core::{Llm, ScholarError, ToolError};
use scholar_llm::RateLimitedClient;
use scholar_prompt::research_instruction;

use crate::{ReportOutline, ScholarConfig};

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error(transparent)]
    Setup(#[from] ScholarError),
    #[error("failed to build tools: {0}")]
    Tools(#[from] ToolError),
    #[error("invalid tool set: {0}")]
    ToolSet(#[from] ToolSetBuildError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct ResearchOutcome {
    pub topic: String,
    pub result: AgentResult,
    pub summary: RunSummary,
    pub missing_sections: Vec<String>,
    pub saved_to: PathBuf,
}

impl ResearchOutcome {
    /// A final answer with every required heading present.
    pub fn is_complete(&self) -> bool {
        self.result.is_complete()
            && !self.result.output.trim().is_empty()
            && self.missing_sections.is_empty()
    }
}

/// `report.md` becomes `report.partial.md`.
pub fn partial_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "md".to_string());
    path.with_file_name(format!("{stem}.partial.{ext}"))
}

/// One topic in, one Markdown file out.
pub struct Researcher<L> {
    executor: AgentExecutor<L>,
    report_path: PathBuf,
}

impl Researcher<Arc<RateLimitedClient>> {
    /// The production wiring: one rate-limited Groq client shared by the
    /// reasoning loop and the `read_page` summarizer.
    pub fn from_config(config: &ScholarConfig) -> Result<Self, ResearchError> {
        let llm = Arc::new(config.model.build_rate_limited()?);
        let tools = ToolSet::new()
            .register_all(scholar_tools::default_tools(llm.clone())?)
            .build()?;
        info!(model = %config.model.model_name, tools = ?tools.names(), "research agent ready");
        Ok(Self::new(
            AgentExecutor::new(llm, tools),
            config.report_path.clone(),
        ))
    }
}

impl<L> Researcher<L>
where
    L: Llm,
{
    pub fn new(executor: AgentExecutor<L>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            report_path: report_path.into(),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub async fn run(&self, topic: &str) -> Result<ResearchOutcome, ResearchError> {
        let topic = topic.trim();
        let instruction = research_instruction(topic)?;
        info!(topic, "research started");

        let (result, events) = self.executor.invoke_with_events(&instruction).await?;
        let summary = RunSummary::from_events(&events);
        for (step, reason) in &summary.parse_failures {
            warn!(step, %reason, "model output was rejected");
        }
        info!(
            raw_output_len = result.output.len(),
            iterations = result.iterations,
            tool_calls = summary.tools_used.len(),
            parse_failures = summary.parse_failures.len(),
            reason = ?result.terminated_reason,
            "agent finished"
        );

        let missing_sections = ReportOutline::new(topic).missing_sections(&result.output);
        let mut outcome = ResearchOutcome {
            topic: topic.to_string(),
            result,
            summary,
            missing_sections,
            saved_to: self.report_path.clone(),
        };

        if !outcome.is_complete() {
            outcome.saved_to = partial_path(&self.report_path);
            warn!(
                reason = ?outcome.result.terminated_reason,
                missing = ?outcome.missing_sections,
                path = %outcome.saved_to.display(),
                "report is incomplete, saving it as partial"
            );
        }

        if let Some(parent) = outcome.saved_to.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&outcome.saved_to, &outcome.result.output).await?;
        info!(path = %outcome.saved_to.display(), "report written");
        Ok(outcome)
    }
}

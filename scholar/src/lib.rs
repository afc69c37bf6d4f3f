//! Scholar: an agent that researches a topic on the web and writes a Markdown
//! report.
//!
//! The member crates are re-exported here; [`Researcher`] wires them into a
//! complete run.

pub mod config;
pub mod report;
pub mod research;

pub use config::ScholarConfig;
pub use report::ReportOutline;
pub use research::{partial_path, ResearchError, ResearchOutcome, Researcher};

pub use scholar_agent as agent;
pub use scholar_core as core;
pub use scholar_llm as llm;
pub use scholar_prompt as prompt;
pub use scholar_tools as tools;

//! Text ReAct agent: a parser for Thought/Action/Final Answer turns, a named
//! tool set, and the executor that loops between them.

mod error;
mod event;
mod executor;
pub mod parser;
mod tooling;

pub use error::{AgentError, ToolDispatchError};
pub use event::{check_event_order, AgentEvent, RunSummary};
pub use executor::{AgentExecutor, AgentResult, TerminationReason, STOP_SEQUENCE};
pub use parser::{parse_response, ParseFailure, ParsedResponse};
pub use tooling::{ToolSet, ToolSetBuildError, ToolSetBuilder};

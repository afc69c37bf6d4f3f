//! The two capabilities a research run can call: `web_search` and `read_page`.
//!
//! Both tools report their own failures as text so the agent can read them as
//! observations and decide what to do next.

mod read_page;
mod web_search;

use std::sync::Arc;

use scholar_core::{Llm, Tool, ToolError};

pub use read_page::{
    extract_paragraphs, summary_prompt, truncate_chars, FetchError, HttpPageFetcher, PageFetcher,
    ReadPageTool, BROWSER_USER_AGENT, DEFAULT_MAX_CHARS, EMPTY_PAGE_MESSAGE, TRUNCATION_MARKER,
};
pub use web_search::{
    DuckDuckGoSearch, SearchError, SearchProvider, WebSearchTool, SEARCH_RATE_LIMIT_MESSAGE,
};

/// `web_search` backed by DuckDuckGo and `read_page` summarizing through `llm`.
pub fn default_tools(llm: Arc<dyn Llm>) -> Result<Vec<Arc<dyn Tool>>, ToolError> {
    let search = DuckDuckGoSearch::new()
        .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
    let read_page = ReadPageTool::new(llm)?;
    Ok(vec![
        Arc::new(WebSearchTool::new(Arc::new(search))),
        Arc::new(read_page),
    ])
}

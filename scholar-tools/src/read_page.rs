use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

use scholar_core::{Llm, Tool, ToolError};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_MAX_CHARS: usize = 10_000;
pub const TRUNCATION_MARKER: &str = "...(truncated)";
pub const EMPTY_PAGE_MESSAGE: &str = "The page seems empty or couldn't be parsed properly.";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Downloads a page body. Non-2xx responses are failures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpPageFetcher {
    http: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Text of every `<p>` element in document order, one per line.
pub fn extract_paragraphs(html: &str) -> String {
    let Ok(paragraph) = Selector::parse("p") else {
        return String::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&paragraph)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Please read the following text from a webpage and summarize the key points relevant to an academic report.\n\
         Focus on facts, dates, key ideas, and definitions.\n\n\
         TEXT FROM PAGE:\n{text}\n\n\
         SUMMARY:"
    )
}

/// The `read_page` tool: fetch, keep paragraph text, summarize with the model.
pub struct ReadPageTool {
    llm: Arc<dyn Llm>,
    fetcher: Arc<dyn PageFetcher>,
    max_chars: usize,
}

impl ReadPageTool {
    pub fn new(llm: Arc<dyn Llm>) -> Result<Self, ToolError> {
        let fetcher =
            HttpPageFetcher::new().map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        Ok(Self::with_fetcher(llm, Arc::new(fetcher)))
    }

    pub fn with_fetcher(llm: Arc<dyn Llm>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            llm,
            fetcher,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

#[async_trait]
impl Tool for ReadPageTool {
    fn name(&self) -> &str {
        "read_page"
    }

    fn description(&self) -> &str {
        "Use this tool to read a specific webpage URL. It fetches the page content and returns a summary of the key information. Input should be a valid URL string (e.g., https://example.com/article)."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let url = input.trim();
        debug!(url, "reading page");

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(err) => {
                warn!(url, error = %err, "page fetch failed");
                return Ok(format!("Error fetching the page: {err}"));
            }
        };

        let text = truncate_chars(&extract_paragraphs(&body), self.max_chars);
        if text.trim().is_empty() {
            return Ok(EMPTY_PAGE_MESSAGE.to_string());
        }

        match self.llm.complete(&summary_prompt(&text)).await {
            Ok(summary) => Ok(format!("Summary of {url}:\n{summary}")),
            Err(err) => {
                warn!(url, error = %err, "page summarization failed");
                Ok(format!("Error reading page content: {err}"))
            }
        }
    }
}

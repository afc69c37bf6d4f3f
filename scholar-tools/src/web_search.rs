use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

use scholar_core::{Tool, ToolError};

use crate::read_page::BROWSER_USER_AGENT;

pub const SEARCH_RATE_LIMIT_MESSAGE: &str =
    "Search Rate Limit hit. Please wait 5 seconds and try a different query.";

const DUCKDUCKGO_BASE_URL: &str = "https://html.duckduckgo.com";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider throttled the request: {0}")]
    Throttled(String),
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    /// Providers do not always report throttling with a distinct status, so
    /// the message text is checked too.
    pub fn is_throttled(&self) -> bool {
        match self {
            SearchError::Throttled(_) => true,
            SearchError::Other(message) => {
                message.contains("429") || message.to_lowercase().contains("ratelimit")
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
            SearchError::Throttled(err.to_string())
        } else {
            SearchError::Other(err.to_string())
        }
    }
}

/// A query-to-text search backend. Results are rendered in provider order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, SearchError>;
}

/// Scrapes the DuckDuckGo HTML endpoint; needs no API key.
pub struct DuckDuckGoSearch {
    http: Client,
    base_url: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self, SearchError> {
        let http = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: DUCKDUCKGO_BASE_URL.to_string(),
            max_results: 5,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let url = format!("{}/html/", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await?;

        let status = response.status();
        // DuckDuckGo answers an over-eager client with 202 and a challenge page.
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::ACCEPTED {
            return Err(SearchError::Throttled(format!("HTTP {}", status.as_u16())));
        }
        if !status.is_success() {
            return Err(SearchError::Other(format!(
                "DuckDuckGo HTML search error: {status}"
            )));
        }

        let body = response.text().await?;
        Ok(parse_results(&body, self.max_results).join("\n\n"))
    }
}

/// `title\n  url\n  snippet` for each result block, in page order.
fn parse_results(html: &str, max_results: usize) -> Vec<String> {
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    let mut parts = Vec::new();
    for result in doc.select(&result_sel) {
        if parts.len() == max_results {
            break;
        }
        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };
        let title = link.text().collect::<String>();
        let title = title.trim();
        if title.is_empty() {
            continue;
        }
        let url = decode_redirect(link.value().attr("href").unwrap_or_default());
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();
        parts.push(format!("{title}\n  {url}\n  {}", snippet.trim()));
    }
    parts
}

/// Result links look like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn decode_redirect(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + "uddg=".len();
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            return percent_decode_str(encoded).decode_utf8_lossy().into_owned();
        }
    }
    href.to_string()
}

/// The `web_search` tool. Waits a fixed pacing delay before every query.
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    pacing: Duration,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            pacing: Duration::from_secs(2),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Use this tool to search the internet for information. Input should be a search query (string)."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        debug!(query, "searching");
        tokio::time::sleep(self.pacing).await;

        match self.provider.search(query).await {
            Ok(results) if results.trim().is_empty() => {
                Ok(format!("No search results found for: {query}"))
            }
            Ok(results) => Ok(results),
            Err(err) if err.is_throttled() => {
                warn!(query, error = %err, "search throttled");
                Ok(SEARCH_RATE_LIMIT_MESSAGE.to_string())
            }
            Err(err) => {
                warn!(query, error = %err, "search failed");
                Ok(format!("Error searching: {err}"))
            }
        }
    }
}

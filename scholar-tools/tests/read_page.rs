use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholar_core::{LlmRequest, LlmResponse, Runnable, ScholarError, Tool};
use scholar_tools::{
    FetchError, PageFetcher, ReadPageTool, EMPTY_PAGE_MESSAGE, TRUNCATION_MARKER,
};

#[derive(Default)]
struct RecordingLlm {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for RecordingLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScholarError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = input
            .messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        if self.fail {
            return Err(ScholarError::LlmProvider("model unavailable".into()));
        }
        Ok(LlmResponse::new("Solar panels convert sunlight."))
    }
}

struct StaticFetcher(Result<String, String>);

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.0.clone().map_err(FetchError::Other)
    }
}

fn tool_with(llm: Arc<RecordingLlm>, body: Result<String, String>) -> ReadPageTool {
    ReadPageTool::with_fetcher(llm, Arc::new(StaticFetcher(body)))
}

#[tokio::test]
async fn page_without_paragraphs_never_calls_the_model() {
    let llm = Arc::new(RecordingLlm::default());
    let tool = tool_with(
        llm.clone(),
        Ok("<html><body><div>nav</div><h2>menu</h2></body></html>".into()),
    );

    let out = tool.invoke("https://example.com").await.unwrap();
    assert_eq!(out, EMPTY_PAGE_MESSAGE);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn whitespace_paragraphs_count_as_empty() {
    let llm = Arc::new(RecordingLlm::default());
    let tool = tool_with(llm.clone(), Ok("<p>   </p><p>\n</p>".into()));

    assert_eq!(tool.invoke("https://example.com").await.unwrap(), EMPTY_PAGE_MESSAGE);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn long_text_is_cut_at_the_boundary_before_summarizing() {
    let llm = Arc::new(RecordingLlm::default());
    let long = "a".repeat(10_500);
    let tool = tool_with(llm.clone(), Ok(format!("<p>{long}</p>")));

    let out = tool.invoke("https://example.com/long").await.unwrap();
    assert_eq!(out, "Summary of https://example.com/long:\nSolar panels convert sunlight.");

    let prompts = llm.prompts.lock().unwrap();
    let expected = format!("TEXT FROM PAGE:\n{}{}\n\nSUMMARY:", "a".repeat(10_000), TRUNCATION_MARKER);
    assert!(prompts[0].contains(&expected));
    assert!(!prompts[0].contains(&"a".repeat(10_001)));
}

#[tokio::test]
async fn text_at_the_limit_is_not_marked() {
    let llm = Arc::new(RecordingLlm::default());
    let tool = tool_with(llm.clone(), Ok(format!("<p>{}</p>", "b".repeat(10_000))));

    tool.invoke("https://example.com").await.unwrap();
    assert!(!llm.prompts.lock().unwrap()[0].contains(TRUNCATION_MARKER));
}

#[tokio::test]
async fn fetch_failure_becomes_an_observation() {
    let llm = Arc::new(RecordingLlm::default());
    let tool = tool_with(llm.clone(), Err("connection refused".into()));

    let out = tool.invoke("https://down.example").await.unwrap();
    assert_eq!(out, "Error fetching the page: connection refused");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn model_failure_becomes_an_observation() {
    let llm = Arc::new(RecordingLlm {
        fail: true,
        ..RecordingLlm::default()
    });
    let tool = tool_with(llm, Ok("<p>content</p>".into()));

    let out = tool.invoke("https://example.com").await.unwrap();
    assert!(out.starts_with("Error reading page content: "), "{out}");
    assert!(out.contains("model unavailable"));
}

#[tokio::test]
async fn http_fetcher_sends_browser_agent_and_reads_paragraphs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", scholar_tools::BROWSER_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Photovoltaics.</p><p>Since 1954.</p></body></html>"),
        )
        .mount(&server)
        .await;

    let llm = Arc::new(RecordingLlm::default());
    let tool = ReadPageTool::new(llm.clone()).unwrap();
    let url = format!("{}/article", server.uri());

    let out = tool.invoke(&url).await.unwrap();
    assert_eq!(out, format!("Summary of {url}:\nSolar panels convert sunlight."));
    assert!(llm.prompts.lock().unwrap()[0].contains("Photovoltaics.\nSince 1954."));
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let llm = Arc::new(RecordingLlm::default());
    let tool = ReadPageTool::new(llm.clone()).unwrap();

    let out = tool.invoke(&format!("{}/missing", server.uri())).await.unwrap();
    assert!(out.starts_with("Error fetching the page: "), "{out}");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_url_is_a_fetch_error() {
    let llm = Arc::new(RecordingLlm::default());
    let tool = ReadPageTool::new(llm).unwrap();

    let out = tool.invoke("not a url").await.unwrap();
    assert!(out.starts_with("Error fetching the page: "), "{out}");
}

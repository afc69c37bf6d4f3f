use std::time::Duration;

use scholar_core::ScholarError;

#[test]
fn error_display_for_llm_provider() {
    let err = ScholarError::LlmProvider("bad gateway".to_string());
    assert_eq!(format!("{err}"), "LLM provider failed: bad gateway");
}

#[test]
fn error_display_for_rate_limited() {
    let err = ScholarError::RateLimited {
        message: "slow down".to_string(),
        retry_after: Some(Duration::from_secs(2)),
    };
    assert_eq!(format!("{err}"), "Rate limited by provider: slow down");
}

#[test]
fn error_display_for_invalid_config() {
    let err = ScholarError::InvalidConfig("base url is required".to_string());
    assert_eq!(format!("{err}"), "Invalid configuration: base url is required");
}

#[test]
fn error_display_for_missing_credential() {
    let err = ScholarError::MissingCredential("GROQ_API_KEY".to_string());
    assert_eq!(format!("{err}"), "Missing credential: GROQ_API_KEY");
}

#[test]
fn error_display_for_timeout() {
    let err = ScholarError::Timeout(Duration::from_secs(10));
    assert_eq!(format!("{err}"), "Operation timed out after 10s");
}

#[test]
fn error_display_for_serde() {
    let parse_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err = ScholarError::Serde(parse_error);
    assert!(format!("{err}").starts_with("Serialization/deserialization error: "));
}

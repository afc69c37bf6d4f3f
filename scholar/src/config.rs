use std::path::PathBuf;

use secrecy::SecretString;
use scholar_core::ScholarError;
use scholar_llm::ModelConfig;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const MODEL_VAR: &str = "SCHOLAR_MODEL";
pub const BASE_URL_VAR: &str = "SCHOLAR_BASE_URL";
pub const REPORT_PATH_VAR: &str = "SCHOLAR_REPORT_PATH";

const DEFAULT_REPORT_PATH: &str = "report.md";

#[derive(Clone, Debug)]
pub struct ScholarConfig {
    pub model: ModelConfig,
    pub report_path: PathBuf,
}

impl ScholarConfig {
    pub fn from_env() -> Result<Self, ScholarError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScholarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR)
            .ok_or_else(|| ScholarError::MissingCredential(API_KEY_VAR.to_string()))?;

        let mut model = ModelConfig::new(SecretString::new(api_key));
        if let Some(name) = get(MODEL_VAR) {
            model = model.with_model(name);
        }
        if let Some(url) = get(BASE_URL_VAR) {
            model = model.with_base_url(url);
        }

        let report_path = get(REPORT_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

        Ok(Self { model, report_path })
    }
}

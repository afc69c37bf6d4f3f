use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use scholar_core::ScholarError;

/// A text template with `{{name}}` placeholders.
///
/// Unknown placeholders render as the empty string. Substituted values are
/// inserted verbatim and never re-scanned, so a value containing `{{x}}` is
/// left alone.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

fn placeholder_pattern() -> Result<&'static Regex, ScholarError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r"\{\{\s*(\w+)\s*\}\}")
        .map_err(|e| ScholarError::InvalidConfig(e.to_string()))?;
    Ok(PATTERN.get_or_init(|| pattern))
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Names of the placeholders in order of first appearance.
    pub fn variables(&self) -> Result<Vec<String>, ScholarError> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder_pattern()?.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String, ScholarError> {
        let rendered = placeholder_pattern()?.replace_all(&self.template, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

use scholar_prompt::REPORT_SECTIONS;

/// The heading skeleton a finished report must follow: `# {topic}` and then
/// the fixed sections, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOutline {
    topic: String,
}

impl ReportOutline {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into().trim().to_string(),
        }
    }

    pub fn headings(&self) -> Vec<String> {
        std::iter::once(format!("# {}", self.topic))
            .chain(REPORT_SECTIONS.iter().map(|s| s.to_string()))
            .collect()
    }

    /// Headings not found in order. Matching is case-insensitive and a heading
    /// may carry trailing text (`## Details of the process`). The title only
    /// needs to be a level-one heading mentioning the topic.
    pub fn missing_sections(&self, report: &str) -> Vec<String> {
        let lines: Vec<String> = report
            .lines()
            .map(|line| line.trim().to_lowercase())
            .collect();
        let topic = self.topic.to_lowercase();
        let mut cursor = 0;
        let mut missing = Vec::new();

        for (index, heading) in self.headings().into_iter().enumerate() {
            let wanted = heading.to_lowercase();
            let found = lines[cursor..].iter().position(|line| {
                if index == 0 {
                    line.starts_with("# ") && line.contains(&topic)
                } else {
                    line.starts_with(&wanted)
                }
            });
            match found {
                Some(offset) => cursor += offset + 1,
                None => missing.push(heading),
            }
        }
        missing
    }
}

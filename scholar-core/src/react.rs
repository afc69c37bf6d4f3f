use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ReActStep {
    Thought(String),
    Action { tool: String, input: String },
    Observation(String),
}

/// Append-only Thought/Action/Observation history of one run.
///
/// Rendered into the `agent_scratchpad` slot of the reasoning prompt. The
/// prompt ends in `Thought:` and every observation is followed by another
/// `Thought:` cue, so the model always continues a thought.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    steps: Vec<ReActStep>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ReActStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ReActStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn observations(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ReActStep::Observation(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            match step {
                ReActStep::Thought(text) => {
                    out.push(' ');
                    out.push_str(text.trim());
                }
                ReActStep::Action { tool, input } => {
                    out.push_str("\nAction: ");
                    out.push_str(tool);
                    out.push_str("\nAction Input: ");
                    out.push_str(input);
                }
                ReActStep::Observation(text) => {
                    out.push_str("\nObservation: ");
                    out.push_str(text);
                    out.push_str("\nThought:");
                }
            }
        }
        out
    }
}

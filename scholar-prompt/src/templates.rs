//! The two fixed prompts of a research run.
//!
//! [`REACT_AGENT_TEMPLATE`] teaches the model the Thought/Action/Observation
//! format and carries the tool catalog and scratchpad. [`RESEARCH_TASK_TEMPLATE`]
//! is the task handed to the agent as its question.

use std::collections::HashMap;

use scholar_core::ScholarError;

use crate::PromptTemplate;

/// Placeholders: `tools`, `tool_names`, `input`, `agent_scratchpad`.
pub const REACT_AGENT_TEMPLATE: &str = "\
Answer the following questions as best you can. You have access to the following tools:

{{tools}}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{tool_names}}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

IMPORTANT:
1. You MUST use the exact format above.
2. If you are ready to write the report, your 'Action' must be \"Final Answer\" (not a tool).
3. The content of the 'Final Answer' must be the FULL MARKDOWN REPORT.
4. Do not output \"Final Answer\" until you have written the full report.

Begin!

Question: {{input}}
Thought:{{agent_scratchpad}}";

/// Placeholder: `topic`.
pub const RESEARCH_TASK_TEMPLATE: &str = "\
You are an academic researcher. Your goal is to write a short report on: \"{{topic}}\".

PLAN:
1. SEARCH: Use 'web_search' to find 3 reliable pages.
2. READ: Use 'read_page' on the best URLs found.
3. WRITE: \"Final Answer\" MUST be the report in Markdown.

REPORT STRUCTURE:
# {{topic}}
## Key Concepts
## Details
## References

IMPORTANT:
- Do not get stuck searching. If one search fails, try another or just read what you have.
- If you have read 2-3 pages, STOP searching and write the report immediately.
- Your Final Answer must be the report in Markdown.
";

/// Second-level sections every report must contain, in order, after the
/// `# {topic}` title.
pub const REPORT_SECTIONS: [&str; 3] = ["## Key Concepts", "## Details", "## References"];

pub fn react_agent_prompt() -> PromptTemplate {
    PromptTemplate::new(REACT_AGENT_TEMPLATE)
}

pub fn research_instruction(topic: &str) -> Result<String, ScholarError> {
    let vars = HashMap::from([("topic", topic.trim().to_string())]);
    PromptTemplate::new(RESEARCH_TASK_TEMPLATE).render(&vars)
}

mod template;
pub mod templates;

pub use template::PromptTemplate;
pub use templates::{react_agent_prompt, research_instruction, REPORT_SECTIONS};

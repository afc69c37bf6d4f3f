use std::collections::HashMap;

use scholar_prompt::templates::{REACT_AGENT_TEMPLATE, RESEARCH_TASK_TEMPLATE};
use scholar_prompt::{react_agent_prompt, research_instruction, REPORT_SECTIONS};

#[test]
fn agent_template_exposes_exactly_the_loop_placeholders() {
    let vars = react_agent_prompt().variables().unwrap();
    assert_eq!(vars, vec!["tools", "tool_names", "input", "agent_scratchpad"]);
    assert!(REACT_AGENT_TEMPLATE.ends_with("Thought:{{agent_scratchpad}}"));
}

#[test]
fn agent_prompt_with_empty_scratchpad_ends_in_thought_cue() {
    let vars = HashMap::from([
        ("tools", "web_search: search".to_string()),
        ("tool_names", "web_search".to_string()),
        ("input", "Write a report".to_string()),
        ("agent_scratchpad", String::new()),
    ]);
    let prompt = react_agent_prompt().render(&vars).unwrap();
    assert!(prompt.contains("should be one of [web_search]"));
    assert!(prompt.contains("Question: Write a report"));
    assert!(prompt.ends_with("Thought:"));
}

#[test]
fn research_instruction_carries_the_report_structure() {
    let instruction = research_instruction("  Solar Power ").unwrap();
    assert!(instruction.contains("write a short report on: \"Solar Power\""));
    assert!(instruction.contains("# Solar Power\n## Key Concepts\n## Details\n## References"));
    for section in REPORT_SECTIONS {
        assert!(RESEARCH_TASK_TEMPLATE.contains(section));
    }
}

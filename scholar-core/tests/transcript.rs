use scholar_core::{LlmRequest, ReActStep, Role, Transcript};

#[test]
fn empty_transcript_renders_empty_scratchpad() {
    assert_eq!(Transcript::new().render(), "");
}

#[test]
fn renders_cycles_in_order_with_thought_cues() {
    let mut transcript = Transcript::new();
    transcript.push(ReActStep::Thought("I should search first.".to_string()));
    transcript.push(ReActStep::Action {
        tool: "web_search".to_string(),
        input: "solar power".to_string(),
    });
    transcript.push(ReActStep::Observation("Solar power is...".to_string()));
    transcript.push(ReActStep::Thought("Now read a page.".to_string()));

    assert_eq!(
        transcript.render(),
        " I should search first.\nAction: web_search\nAction Input: solar power\n\
         Observation: Solar power is...\nThought: Now read a page."
    );
    assert_eq!(transcript.len(), 4);
    assert_eq!(
        transcript.observations().collect::<Vec<_>>(),
        vec!["Solar power is..."]
    );
}

#[test]
fn prompt_requests_are_single_user_turns() {
    let request = LlmRequest::from_prompt("hello").with_stop(vec!["\nObservation:".to_string()]);
    assert!(request.model.is_empty());
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    assert_eq!(request.stop, vec!["\nObservation:".to_string()]);

    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("temperature").is_none());
}

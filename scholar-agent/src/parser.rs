//! Grammar for the model's free-text reasoning turns.
//!
//! A turn is an optional `Thought:` followed by either an
//! `Action:` / `Action Input:` pair or a `Final Answer:`. Anything the model
//! writes after a `\nObservation:` line is its own invention and is dropped.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

pub const FINAL_ANSWER_ACTION: &str = "Final Answer";
const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const OBSERVATION_MARKER: &str = "\nObservation:";

/// Fed back when the model thinks without choosing an action.
pub const MISSING_ACTION_MESSAGE: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedResponse {
    Thought(String),
    ActionCall {
        thought: Option<String>,
        tool: String,
        input: String,
    },
    FinalAnswer {
        thought: Option<String>,
        text: String,
    },
    Malformed {
        raw: String,
        reason: ParseFailure,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    EmptyResponse,
    MissingActionInput,
    ActionAndFinalAnswer,
    EmptyFinalAnswer,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::EmptyResponse => f.write_str("Invalid Format: the response was empty"),
            ParseFailure::MissingActionInput => {
                f.write_str("Invalid Format: Missing 'Action Input:' after 'Action:'")
            }
            ParseFailure::ActionAndFinalAnswer => f.write_str(
                "Invalid Format: the response contains both a final answer and an action; give only one",
            ),
            ParseFailure::EmptyFinalAnswer => {
                f.write_str("Invalid Format: 'Final Answer:' must be followed by the answer")
            }
        }
    }
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> Option<&'static Regex> {
    if let Some(re) = cell.get() {
        return Some(re);
    }
    let re = Regex::new(pattern).ok()?;
    Some(cell.get_or_init(|| re))
}

fn action_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)",
    )
}

fn action_line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"Action\s*\d*\s*:")
}

/// Everything before `end`, minus a leading `Thought:` label.
fn leading_thought(text: &str, end: usize) -> Option<String> {
    let head = text[..end].trim();
    let head = head.strip_prefix("Thought:").unwrap_or(head).trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// The part of a response the model actually authored: everything before the
/// first observation it tried to write for itself.
pub fn own_turn(raw: &str) -> &str {
    match raw.find(OBSERVATION_MARKER) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

pub fn parse_response(raw: &str) -> ParsedResponse {
    let text = own_turn(raw).trim();

    if text.is_empty() {
        return ParsedResponse::Malformed {
            raw: raw.to_string(),
            reason: ParseFailure::EmptyResponse,
        };
    }

    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_regex().and_then(|re| re.captures(text)) {
        let (Some(whole), Some(tool), Some(input)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            return ParsedResponse::Malformed {
                raw: raw.to_string(),
                reason: ParseFailure::MissingActionInput,
            };
        };
        let thought = leading_thought(text, whole.start());
        let tool = tool.as_str().trim().to_string();
        let input = input.as_str().trim();

        if tool == FINAL_ANSWER_ACTION {
            if input.is_empty() {
                return ParsedResponse::Malformed {
                    raw: raw.to_string(),
                    reason: ParseFailure::EmptyFinalAnswer,
                };
            }
            return ParsedResponse::FinalAnswer {
                thought,
                text: input.to_string(),
            };
        }
        if includes_answer {
            return ParsedResponse::Malformed {
                raw: raw.to_string(),
                reason: ParseFailure::ActionAndFinalAnswer,
            };
        }
        return ParsedResponse::ActionCall {
            thought,
            tool,
            input: input.trim_matches('"').trim().to_string(),
        };
    }

    if includes_answer {
        let idx = text.rfind(FINAL_ANSWER_MARKER).unwrap_or_default();
        let answer = text[idx + FINAL_ANSWER_MARKER.len()..].trim();
        if answer.is_empty() {
            return ParsedResponse::Malformed {
                raw: raw.to_string(),
                reason: ParseFailure::EmptyFinalAnswer,
            };
        }
        return ParsedResponse::FinalAnswer {
            thought: leading_thought(text, idx),
            text: answer.to_string(),
        };
    }

    if action_line_regex().is_some_and(|re| re.is_match(text)) {
        return ParsedResponse::Malformed {
            raw: raw.to_string(),
            reason: ParseFailure::MissingActionInput,
        };
    }

    ParsedResponse::Thought(leading_thought(text, text.len()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_with_thought() {
        let parsed = parse_response(
            "I should look this up.\nAction: web_search\nAction Input: solar power history",
        );
        assert_eq!(
            parsed,
            ParsedResponse::ActionCall {
                thought: Some("I should look this up.".into()),
                tool: "web_search".into(),
                input: "solar power history".into(),
            }
        );
    }

    #[test]
    fn strips_quotes_and_whitespace_from_input() {
        let parsed = parse_response("Action: read_page\nAction Input: \"https://a.example/x\"  \n");
        assert!(matches!(
            parsed,
            ParsedResponse::ActionCall { ref input, thought: None, .. } if input == "https://a.example/x"
        ));
    }

    #[test]
    fn final_answer_action_keeps_surrounding_quotes() {
        let parsed = parse_response(
            "Action: Final Answer\nAction Input: # Solar\n## References\n- \"Solar Energy\"",
        );
        assert_eq!(
            parsed,
            ParsedResponse::FinalAnswer {
                thought: None,
                text: "# Solar\n## References\n- \"Solar Energy\"".into(),
            }
        );
    }

    #[test]
    fn drops_hallucinated_observations() {
        let parsed = parse_response(
            "Action: web_search\nAction Input: solar\nObservation: made up results\nFinal Answer: done",
        );
        assert!(matches!(
            parsed,
            ParsedResponse::ActionCall { ref tool, ref input, .. } if tool == "web_search" && input == "solar"
        ));
    }

    #[test]
    fn final_answer_keeps_multiline_markdown() {
        let parsed = parse_response(
            "Thought: I now know the final answer\nFinal Answer: # Solar\n## Key Concepts\nSun.",
        );
        assert_eq!(
            parsed,
            ParsedResponse::FinalAnswer {
                thought: Some("I now know the final answer".into()),
                text: "# Solar\n## Key Concepts\nSun.".into(),
            }
        );
    }

    #[test]
    fn final_answer_spelled_as_an_action_terminates() {
        let parsed = parse_response("Action: Final Answer\nAction Input: # Report\n## Details");
        assert_eq!(
            parsed,
            ParsedResponse::FinalAnswer {
                thought: None,
                text: "# Report\n## Details".into(),
            }
        );
    }

    #[test]
    fn action_plus_final_answer_is_malformed() {
        let parsed =
            parse_response("Action: web_search\nAction Input: x\nFinal Answer: the report");
        assert!(matches!(
            parsed,
            ParsedResponse::Malformed { reason: ParseFailure::ActionAndFinalAnswer, .. }
        ));
    }

    #[test]
    fn action_without_input_is_malformed() {
        let parsed = parse_response("Thought: search\nAction: web_search");
        assert!(matches!(
            parsed,
            ParsedResponse::Malformed { reason: ParseFailure::MissingActionInput, .. }
        ));
    }

    #[test]
    fn empty_answer_and_empty_response_are_malformed() {
        assert!(matches!(
            parse_response("Final Answer:   "),
            ParsedResponse::Malformed { reason: ParseFailure::EmptyFinalAnswer, .. }
        ));
        assert!(matches!(
            parse_response("  \n "),
            ParsedResponse::Malformed { reason: ParseFailure::EmptyResponse, .. }
        ));
    }

    #[test]
    fn bare_reasoning_is_a_thought() {
        assert_eq!(
            parse_response(" I need more sources first."),
            ParsedResponse::Thought("I need more sources first.".into())
        );
    }
}

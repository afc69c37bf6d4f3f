use std::collections::HashMap;

use tracing::{debug, info, warn};

use scholar_core::{Llm, LlmRequest, ReActStep, Transcript};
use scholar_prompt::{react_agent_prompt, PromptTemplate};

use crate::parser::{own_turn, parse_response, ParsedResponse, MISSING_ACTION_MESSAGE};
use crate::{AgentError, AgentEvent, ToolSet};

/// Keeps the model from writing the tool's answer itself.
pub const STOP_SEQUENCE: &str = "\nObservation:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    FinalAnswer,
    MaxIterationsReached,
    ParsingExhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentResult {
    pub output: String,
    pub terminated_reason: TerminationReason,
    /// Reasoning calls made, including ones whose output could not be used.
    pub iterations: u32,
}

impl AgentResult {
    pub fn is_complete(&self) -> bool {
        self.terminated_reason == TerminationReason::FinalAnswer
    }
}

/// Drives the text ReAct loop: prompt the model with the transcript so far,
/// parse its turn, run the named tool, append the observation, repeat.
pub struct AgentExecutor<L> {
    llm: L,
    tools: ToolSet,
    prompt: PromptTemplate,
    max_iterations: u32,
    max_parse_failures: u32,
}

impl<L> AgentExecutor<L>
where
    L: Llm,
{
    pub fn new(llm: L, tools: ToolSet) -> Self {
        Self {
            llm,
            tools,
            prompt: react_agent_prompt(),
            max_iterations: 15,
            max_parse_failures: 3,
        }
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Consecutive unusable responses tolerated before giving up.
    pub fn with_max_parse_failures(mut self, max: u32) -> Self {
        self.max_parse_failures = max.max(1);
        self
    }

    /// Must use the `tools`, `tool_names`, `input` and `agent_scratchpad`
    /// placeholders.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub async fn invoke(&self, input: &str) -> Result<AgentResult, AgentError> {
        let (result, _) = self.invoke_with_events(input).await?;
        Ok(result)
    }

    fn render_prompt(&self, input: &str, transcript: &Transcript) -> Result<String, AgentError> {
        let vars = HashMap::from([
            ("tools", self.tools.catalog()),
            ("tool_names", self.tools.names().join(", ")),
            ("input", input.to_string()),
            ("agent_scratchpad", transcript.render()),
        ]);
        self.prompt
            .render(&vars)
            .map_err(|source| AgentError::PromptRender { source })
    }

    pub async fn invoke_with_events(
        &self,
        input: &str,
    ) -> Result<(AgentResult, Vec<AgentEvent>), AgentError> {
        let mut transcript = Transcript::new();
        let mut events = Vec::new();
        let mut parse_failures = 0u32;

        for step_id in 1..=self.max_iterations {
            events.push(AgentEvent::StepStarted { step_id });
            let prompt = self.render_prompt(input, &transcript)?;
            debug!(step = step_id, prompt_chars = prompt.len(), "requesting next step");

            let request = LlmRequest::from_prompt(prompt).with_stop(vec![STOP_SEQUENCE.to_string()]);
            let response = self
                .llm
                .invoke(request)
                .await
                .map_err(|source| AgentError::ModelTransport { step_id, source })?;
            events.push(AgentEvent::ModelResponded { step_id });

            match parse_response(&response.content) {
                ParsedResponse::FinalAnswer { text, .. } => {
                    info!(step = step_id, "final answer produced");
                    return Ok(finish(
                        events,
                        step_id,
                        text,
                        TerminationReason::FinalAnswer,
                    ));
                }
                ParsedResponse::ActionCall {
                    thought,
                    tool,
                    input: tool_input,
                } => {
                    parse_failures = 0;
                    if let Some(thought) = thought {
                        transcript.push(ReActStep::Thought(thought));
                    }
                    transcript.push(ReActStep::Action {
                        tool: tool.clone(),
                        input: tool_input.clone(),
                    });

                    let known = self.tools.contains(&tool);
                    if known {
                        info!(step = step_id, tool = %tool, input = %tool_input, "dispatching tool");
                        events.push(AgentEvent::ToolDispatched {
                            step_id,
                            tool: tool.clone(),
                        });
                    } else {
                        warn!(step = step_id, tool = %tool, "model named an unknown tool");
                    }
                    let observation = self
                        .tools
                        .dispatch(&tool, &tool_input)
                        .await
                        .unwrap_or_else(|err| err.to_string());
                    if known {
                        events.push(AgentEvent::ToolCompleted { step_id });
                    }
                    debug!(step = step_id, observation_chars = observation.len(), "observation recorded");
                    transcript.push(ReActStep::Observation(observation));
                }
                ParsedResponse::Thought(thought) => {
                    parse_failures = 0;
                    debug!(step = step_id, "thought without an action");
                    transcript.push(ReActStep::Thought(thought));
                    transcript.push(ReActStep::Observation(MISSING_ACTION_MESSAGE.to_string()));
                }
                ParsedResponse::Malformed { raw, reason } => {
                    parse_failures += 1;
                    warn!(step = step_id, failures = parse_failures, %reason, "could not parse model output");
                    events.push(AgentEvent::ParseFailed {
                        step_id,
                        reason: reason.to_string(),
                    });
                    if parse_failures >= self.max_parse_failures {
                        return Ok(finish(
                            events,
                            step_id,
                            raw,
                            TerminationReason::ParsingExhausted,
                        ));
                    }
                    transcript.push(ReActStep::Thought(own_turn(&raw).trim().to_string()));
                    transcript.push(ReActStep::Observation(reason.to_string()));
                }
            }
        }

        warn!(max_iterations = self.max_iterations, "iteration budget exhausted");
        let last_step = self.max_iterations;
        let output = transcript.render().trim().to_string();
        if last_step == 0 {
            return Ok((
                AgentResult {
                    output,
                    terminated_reason: TerminationReason::MaxIterationsReached,
                    iterations: 0,
                },
                events,
            ));
        }
        Ok(finish(
            events,
            last_step,
            output,
            TerminationReason::MaxIterationsReached,
        ))
    }
}

fn finish(
    mut events: Vec<AgentEvent>,
    step_id: u32,
    output: String,
    reason: TerminationReason,
) -> (AgentResult, Vec<AgentEvent>) {
    events.push(AgentEvent::Completed { step_id, reason });
    (
        AgentResult {
            output,
            terminated_reason: reason,
            iterations: step_id,
        },
        events,
    )
}

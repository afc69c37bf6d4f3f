use crate::TerminationReason;

/// Lifecycle of one run, one `step_id` per reasoning call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    StepStarted { step_id: u32 },
    ModelResponded { step_id: u32 },
    ToolDispatched { step_id: u32, tool: String },
    ToolCompleted { step_id: u32 },
    ParseFailed { step_id: u32, reason: String },
    Completed { step_id: u32, reason: TerminationReason },
}

impl AgentEvent {
    pub fn step_id(&self) -> u32 {
        match self {
            AgentEvent::StepStarted { step_id }
            | AgentEvent::ModelResponded { step_id }
            | AgentEvent::ToolDispatched { step_id, .. }
            | AgentEvent::ToolCompleted { step_id }
            | AgentEvent::ParseFailed { step_id, .. }
            | AgentEvent::Completed { step_id, .. } => *step_id,
        }
    }
}

/// What a finished run did, read back from its event log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tool names in dispatch order.
    pub tools_used: Vec<String>,
    /// `(step_id, reason)` for every turn the parser rejected.
    pub parse_failures: Vec<(u32, String)>,
    pub completed: Option<TerminationReason>,
}

impl RunSummary {
    pub fn from_events(events: &[AgentEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            match event {
                AgentEvent::ToolDispatched { tool, .. } => summary.tools_used.push(tool.clone()),
                AgentEvent::ParseFailed { step_id, reason } => {
                    summary.parse_failures.push((*step_id, reason.clone()))
                }
                AgentEvent::Completed { reason, .. } => summary.completed = Some(*reason),
                _ => {}
            }
        }
        summary
    }
}

/// Checks that a log reads as one run: steps numbered from 1 without gaps,
/// each step's events after its `StepStarted`, every dispatched tool completed
/// within its own step, and a single `Completed` closing the log.
pub fn check_event_order(events: &[AgentEvent]) -> Result<(), String> {
    let mut current: Option<u32> = None;
    let mut tool_open = false;
    let mut closed = false;

    for (index, event) in events.iter().enumerate() {
        if closed {
            return Err(format!("event at index {index} follows Completed"));
        }

        let step_id = event.step_id();
        if let AgentEvent::StepStarted { .. } = event {
            let expected = current.map_or(1, |step| step + 1);
            if step_id != expected {
                return Err(format!("step {step_id} started where step {expected} was due"));
            }
            if tool_open {
                return Err(format!("step {step_id} started with a tool still running"));
            }
            current = Some(step_id);
            continue;
        }

        if current != Some(step_id) {
            return Err(format!(
                "{event:?} at index {index} does not belong to the open step"
            ));
        }
        match event {
            AgentEvent::ToolDispatched { .. } if tool_open => {
                return Err(format!("second dispatch in step {step_id}"));
            }
            AgentEvent::ToolDispatched { .. } => tool_open = true,
            AgentEvent::ToolCompleted { .. } if !tool_open => {
                return Err(format!("ToolCompleted without dispatch in step {step_id}"));
            }
            AgentEvent::ToolCompleted { .. } => tool_open = false,
            AgentEvent::Completed { .. } if tool_open => {
                return Err(format!("run completed with a tool still running in step {step_id}"));
            }
            AgentEvent::Completed { .. } => closed = true,
            _ => {}
        }
    }

    match events.last() {
        None | Some(AgentEvent::Completed { .. }) => Ok(()),
        Some(_) => Err("log does not end with Completed".to_string()),
    }
}

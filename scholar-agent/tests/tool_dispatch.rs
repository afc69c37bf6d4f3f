use std::sync::Arc;

use async_trait::async_trait;
use scholar_agent::{ToolDispatchError, ToolSet, ToolSetBuildError};
use scholar_core::{Tool, ToolError};

struct StaticTool {
    name: &'static str,
    behaviour: Behaviour,
}

enum Behaviour {
    Echo,
    Fail,
    Panic,
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Test tool."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        match self.behaviour {
            Behaviour::Echo => Ok(input.to_uppercase()),
            Behaviour::Fail => Err(ToolError::ExecutionFailed("disk full".into())),
            Behaviour::Panic => panic!("boom"),
        }
    }
}

fn tool(name: &'static str, behaviour: Behaviour) -> Arc<dyn Tool> {
    Arc::new(StaticTool { name, behaviour })
}

#[tokio::test]
async fn dispatch_runs_the_named_tool() {
    let tools = ToolSet::new().register(tool("echo", Behaviour::Echo)).build().unwrap();

    assert_eq!(tools.dispatch("echo", "hi").await.unwrap(), "HI");
}

#[tokio::test]
async fn unknown_tool_lists_the_valid_names() {
    let tools = ToolSet::new()
        .register(tool("web_search", Behaviour::Echo))
        .register(tool("read_page", Behaviour::Echo))
        .build()
        .unwrap();

    let err = tools.dispatch("browse", "x").await.unwrap_err();
    assert!(matches!(err, ToolDispatchError::UnknownTool { ref name, .. } if name == "browse"));
    assert_eq!(
        err.to_string(),
        "browse is not a valid tool, try one of [web_search, read_page]."
    );
}

#[tokio::test]
async fn tool_errors_become_observations() {
    let tools = ToolSet::new().register(tool("disk", Behaviour::Fail)).build().unwrap();

    let observation = tools.dispatch("disk", "x").await.unwrap();
    assert_eq!(observation, "Tool disk failed: execution failed: disk full");
}

#[tokio::test]
async fn tool_panics_become_observations() {
    let tools = ToolSet::new().register(tool("bad", Behaviour::Panic)).build().unwrap();

    let observation = tools.dispatch("bad", "x").await.unwrap();
    assert_eq!(observation, "Tool bad failed unexpectedly: boom");
}

#[test]
fn duplicate_names_are_rejected() {
    let err = ToolSet::new()
        .register(tool("echo", Behaviour::Echo))
        .register(tool("echo", Behaviour::Fail))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ToolSetBuildError::DuplicateName {
            name: "echo".into()
        }
    );
}

#[test]
fn blank_names_are_rejected() {
    let err = ToolSet::new()
        .register(tool("  ", Behaviour::Echo))
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolSetBuildError::InvalidName { .. }));
}

#[test]
fn catalog_follows_registration_order() {
    let tools = ToolSet::new()
        .register_all([tool("b", Behaviour::Echo), tool("a", Behaviour::Echo)])
        .build()
        .unwrap();
    assert_eq!(tools.names(), vec!["b", "a"]);
    assert_eq!(tools.catalog(), "b: Test tool.\na: Test tool.");
}

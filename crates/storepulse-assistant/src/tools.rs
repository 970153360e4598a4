// Tool abstraction for the assistant
//
// Tools answer in natural language. The outcome type keeps "the lookup
// succeeded but found nothing" (a Reply) distinct from "the call itself
// failed" (Failed with its cause); only at the agent boundary does a
// failure degrade into an apologetic sentence.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Outcome of a tool execution
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// A sentence for the agent to work into its answer
    Reply(String),

    /// The call itself failed; `message` names the attempted action,
    /// `cause` carries the underlying error
    Failed { message: String, cause: String },
}

impl ToolOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        ToolOutcome::Reply(text.into())
    }

    pub fn failed(message: impl Into<String>, cause: impl Into<String>) -> Self {
        ToolOutcome::Failed {
            message: message.into(),
            cause: cause.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ToolOutcome::Failed { .. })
    }

    /// Render the outcome as the text handed back to the model. Failures
    /// become an apology embedding the cause; they never propagate into the
    /// agent's control flow.
    pub fn render(self) -> String {
        match self {
            ToolOutcome::Reply(text) => text,
            ToolOutcome::Failed { message, cause } => {
                error!(action = %message, cause = %cause, "tool call failed");
                format!("I'm sorry, I couldn't {}: {}", message, cause)
            }
        }
    }
}

/// A named lookup the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model invokes the tool by
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments
    fn parameters_schema(&self) -> Value;

    /// Execute with the model-supplied arguments
    async fn execute(&self, arguments: Value) -> ToolOutcome;
}

/// Wire-level tool definition handed to the chat driver
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry holding the tools available to one assistant
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Register a tool, replacing any existing tool with the same name
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for the chat driver's `tools` request field
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Execute a tool by name. An unknown name is itself a Failed outcome
    /// so the model can recover.
    pub async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome {
        match self.tools.get(name) {
            Some(tool) => tool.execute(arguments).await,
            None => ToolOutcome::failed(
                format!("run the {} tool", name),
                "no such tool is registered",
            ),
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for fluent tool registration
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.registry.register(tool);
        self
    }

    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct GreetingTool;

    #[async_trait]
    impl Tool for GreetingTool {
        fn name(&self) -> &str {
            "greet"
        }

        fn description(&self) -> &str {
            "Produce a greeting"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}, "additionalProperties": false})
        }

        async fn execute(&self, _arguments: Value) -> ToolOutcome {
            ToolOutcome::reply("Hello there.")
        }
    }

    #[tokio::test]
    async fn test_registry_executes_registered_tool() {
        let registry = ToolRegistry::builder().tool(GreetingTool).build();

        assert!(registry.has("greet"));
        let outcome = registry.execute("greet", json!({})).await;
        assert_eq!(outcome, ToolOutcome::reply("Hello there."));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_failed_outcome() {
        let registry = ToolRegistry::new();

        let outcome = registry.execute("missing", json!({})).await;
        assert!(outcome.is_failed());
    }

    #[test]
    fn test_render_keeps_reply_text() {
        assert_eq!(ToolOutcome::reply("42 visitors").render(), "42 visitors");
    }

    #[test]
    fn test_render_turns_failure_into_apology_with_cause() {
        let rendered =
            ToolOutcome::failed("check the queue", "connection refused").render();
        assert!(rendered.contains("I'm sorry"));
        assert!(rendered.contains("check the queue"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_specs_expose_schema() {
        let registry = ToolRegistry::builder().tool(GreetingTool).build();
        let specs = registry.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "greet");
        assert_eq!(specs[0].parameters["type"], "object");
    }
}

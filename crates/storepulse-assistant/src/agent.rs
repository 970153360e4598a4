// The assistant agent loop
//
// Conversation memory is the full wire-format message history, retained
// across turns. Each user turn runs the tool-calling loop until the model
// answers in text or the iteration guard trips.

use tracing::debug;

use crate::config::AssistantConfig;
use crate::driver::{ChatDriver, ChatMessage};
use crate::error::{AssistantError, Result};
use crate::tools::ToolRegistry;

const SYSTEM_PROMPT: &str = "You are a helpful retail store assistant. You can check the \
current number of visitors, find the busiest store section, and report the cashier queue \
and wait time using your tools. Answer briefly and in plain language; when a tool reports \
a problem, relay its message instead of guessing.";

pub struct Assistant {
    driver: ChatDriver,
    registry: ToolRegistry,
    model: String,
    max_iterations: usize,
    memory: Vec<ChatMessage>,
}

impl Assistant {
    pub fn new(config: &AssistantConfig, registry: ToolRegistry) -> Self {
        Self {
            driver: ChatDriver::new(&config.api_key, &config.api_url),
            registry,
            model: config.model.clone(),
            max_iterations: config.max_iterations,
            memory: vec![ChatMessage::system(SYSTEM_PROMPT)],
        }
    }

    /// Number of messages currently held in memory (system prompt included)
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Handle one user turn and return the assistant's text answer.
    pub async fn handle(&mut self, user_input: &str) -> Result<String> {
        self.memory.push(ChatMessage::user(user_input));

        let specs = self.registry.specs();
        for _ in 0..self.max_iterations {
            let reply = self.driver.chat(&self.model, &self.memory, &specs).await?;
            self.memory.push(reply.clone());

            let calls = reply.parsed_tool_calls();
            if calls.is_empty() {
                return Ok(reply.content.unwrap_or_default());
            }

            for call in calls {
                debug!(tool = %call.name, "executing tool call");
                let outcome = self.registry.execute(&call.name, call.arguments).await;
                self.memory.push(ChatMessage::tool(call.id, outcome.render()));
            }
        }

        Err(AssistantError::MaxIterationsReached(self.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolOutcome};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedCountTool;

    #[async_trait]
    impl Tool for FixedCountTool {
        fn name(&self) -> &str {
            "get_current_visitors"
        }

        fn description(&self) -> &str {
            "Get the current visitor count"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}, "additionalProperties": false})
        }

        async fn execute(&self, _arguments: Value) -> ToolOutcome {
            ToolOutcome::reply("There are currently 42 visitors in the store.")
        }
    }

    fn config_for(server: &MockServer) -> AssistantConfig {
        AssistantConfig::new("http://localhost:8000", "test-key")
            .with_api_url(format!("{}/v1/chat/completions", server.uri()))
            .with_model("test-model")
    }

    #[tokio::test]
    async fn test_plain_answer_without_tools() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Happy to help."}
                }]
            })))
            .mount(&server)
            .await;

        let mut assistant = Assistant::new(&config_for(&server), ToolRegistry::new());
        let answer = assistant.handle("hello").await.unwrap();
        assert_eq!(answer, "Happy to help.");
        // system + user + assistant
        assert_eq!(assistant.memory_len(), 3);
    }

    #[tokio::test]
    async fn test_tool_round_trip_reaches_final_answer() {
        let server = MockServer::start().await;

        // First completion asks for the tool, second answers in text
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "get_current_visitors", "arguments": "{}"}
                        }]
                    }
                }]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "42 visitors right now."}
                }]
            })))
            .mount(&server)
            .await;

        let registry = ToolRegistry::builder().tool(FixedCountTool).build();
        let mut assistant = Assistant::new(&config_for(&server), registry);

        let answer = assistant.handle("how many visitors?").await.unwrap();
        assert_eq!(answer, "42 visitors right now.");
        // system + user + tool-call turn + tool result + final answer
        assert_eq!(assistant.memory_len(), 5);
    }

    #[tokio::test]
    async fn test_memory_persists_across_turns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Noted."}
                }]
            })))
            .mount(&server)
            .await;

        let mut assistant = Assistant::new(&config_for(&server), ToolRegistry::new());
        assistant.handle("first question").await.unwrap();
        assistant.handle("second question").await.unwrap();
        // system + 2 x (user + assistant)
        assert_eq!(assistant.memory_len(), 5);
    }

    #[tokio::test]
    async fn test_endless_tool_calls_trip_the_iteration_guard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_loop",
                            "type": "function",
                            "function": {"name": "get_current_visitors", "arguments": "{}"}
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let registry = ToolRegistry::builder().tool(FixedCountTool).build();
        let config = config_for(&server).with_max_iterations(3);
        let mut assistant = Assistant::new(&config, registry);

        let err = assistant.handle("loop forever").await.unwrap_err();
        assert!(matches!(err, AssistantError::MaxIterationsReached(3)));
    }
}

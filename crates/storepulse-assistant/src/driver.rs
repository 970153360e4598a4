// OpenAI-protocol chat driver (non-streaming)
//
// Works against any OpenAI-compatible chat-completions endpoint. The REPL
// prints whole turns, so requests are issued with stream: false and the
// complete response is parsed in one piece.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AssistantError, Result};
use crate::tools::ToolSpec;

/// One message on the wire, also used as conversation memory so assistant
/// turns echo back exactly as the endpoint produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A tool result answering one tool call
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Tool calls requested by this message, with arguments parsed from the
    /// wire's JSON string (malformed arguments decay to an empty object)
    pub fn parsed_tool_calls(&self) -> Vec<ParsedToolCall> {
        self.tool_calls
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|tc| ParsedToolCall {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or_else(|_| json!({})),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallWire {
    pub id: String,
    pub r#type: String,
    pub function: FunctionCallWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallWire {
    pub name: String,
    /// JSON-encoded arguments, as the protocol carries them
    pub arguments: String,
}

/// A tool call with its arguments decoded
#[derive(Debug, Clone)]
pub struct ParsedToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Clone)]
pub struct ChatDriver {
    client: Client,
    api_key: String,
    api_url: String,
}

impl ChatDriver {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one chat completion and return the assistant message verbatim.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatMessage> {
        let tools = if tools.is_empty() {
            None
        } else {
            Some(
                tools
                    .iter()
                    .map(|spec| WireTool {
                        r#type: "function".to_string(),
                        function: WireFunction {
                            name: spec.name.clone(),
                            description: spec.description.clone(),
                            parameters: spec.parameters.clone(),
                        },
                    })
                    .collect(),
            )
        };

        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            stream: false,
            tools,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::llm(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::llm(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::llm(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AssistantError::llm("Chat API returned no choices"))
    }
}

impl std::fmt::Debug for ChatDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatDriver")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
}

#[derive(Debug, Serialize)]
struct WireTool {
    r#type: String,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn driver_for(server: &MockServer) -> ChatDriver {
        ChatDriver::new("test-key", format!("{}/v1/chat/completions", server.uri()))
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let driver = ChatDriver::new("sk-secret", "https://example.com/v1/chat/completions");
        let debug = format!("{:?}", driver);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_chat_returns_text_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "The store is quiet."}
                }]
            })))
            .mount(&server)
            .await;

        let driver = driver_for(&server);
        let reply = driver
            .chat("test-model", &[ChatMessage::user("How busy is it?")], &[])
            .await
            .unwrap();

        assert_eq!(reply.content.as_deref(), Some("The store is quiet."));
        assert!(reply.parsed_tool_calls().is_empty());
    }

    #[tokio::test]
    async fn test_chat_parses_tool_call_arguments() {
        let server = MockServer::start().await;
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
                            "function": {
                                "name": "get_current_visitors",
                                "arguments": "{}"
                            }
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let driver = driver_for(&server);
        let reply = driver
            .chat("test-model", &[ChatMessage::user("visitors?")], &[])
            .await
            .unwrap();

        let calls = reply.parsed_tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_current_visitors");
        assert_eq!(calls[0].arguments, json!({}));
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let driver = driver_for(&server);
        let err = driver
            .chat("test-model", &[ChatMessage::user("hi")], &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_malformed_arguments_decay_to_empty_object() {
        let message = ChatMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(vec![ToolCallWire {
                id: "call_1".to_string(),
                r#type: "function".to_string(),
                function: FunctionCallWire {
                    name: "get_cashier_queue".to_string(),
                    arguments: "not json".to_string(),
                },
            }]),
            tool_call_id: None,
        };

        let calls = message.parsed_tool_calls();
        assert_eq!(calls[0].arguments, json!({}));
    }
}

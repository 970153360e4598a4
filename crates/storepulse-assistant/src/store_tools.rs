// The three store lookup tools
//
// Each issues one GET against the analytics API and renders a sentence
// from the JSON. An empty result is still a Reply; only a failed call
// becomes a Failed outcome.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::tools::{Tool, ToolOutcome};

fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

/// Reports the visitor count over the trailing 15 minutes
pub struct CurrentVisitorsTool {
    backend: Arc<BackendClient>,
}

impl CurrentVisitorsTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for CurrentVisitorsTool {
    fn name(&self) -> &str {
        "get_current_visitors"
    }

    fn description(&self) -> &str {
        "Get the number of visitors currently in the store (counted over the last 15 minutes)."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _arguments: Value) -> ToolOutcome {
        match self.backend.current_visitors().await {
            Ok(current) => ToolOutcome::reply(format!(
                "There are currently {} visitors in the store.",
                current.current_visitors
            )),
            Err(err) => {
                ToolOutcome::failed("check the current visitor count", format!("{:#}", err))
            }
        }
    }
}

/// Names the busiest section over the trailing 24 hours
pub struct BusiestSectionTool {
    backend: Arc<BackendClient>,
}

impl BusiestSectionTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for BusiestSectionTool {
    fn name(&self) -> &str {
        "get_busiest_section"
    }

    fn description(&self) -> &str {
        "Get the busiest store section by visitor count over the last 24 hours."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _arguments: Value) -> ToolOutcome {
        match self.backend.section_traffic().await {
            // The sections endpoint orders busiest first
            Ok(sections) => match sections.first() {
                Some(busiest) => ToolOutcome::reply(format!(
                    "The busiest section is {} with {} visitors over the last 24 hours.",
                    busiest.section, busiest.total_visitors
                )),
                None => ToolOutcome::reply(
                    "No section traffic has been recorded in the last 24 hours.",
                ),
            },
            Err(err) => ToolOutcome::failed("find the busiest section", format!("{:#}", err)),
        }
    }
}

/// Reports the cashier queue and an estimated wait
pub struct CashierQueueTool {
    backend: Arc<BackendClient>,
}

impl CashierQueueTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for CashierQueueTool {
    fn name(&self) -> &str {
        "get_cashier_queue"
    }

    fn description(&self) -> &str {
        "Get the current cashier queue length, status, and estimated wait time."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _arguments: Value) -> ToolOutcome {
        match self.backend.current_cashier().await {
            Ok(Some(status)) => ToolOutcome::reply(format!(
                "The cashier queue has {} people (status: {}); estimated wait is about {:.0} minutes.",
                status.queue_length,
                status.status,
                status.estimated_wait_minutes()
            )),
            Ok(None) => ToolOutcome::reply("No cashier data is available right now."),
            Err(err) => ToolOutcome::failed("check the cashier queue", format!("{:#}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(server: &MockServer) -> Arc<BackendClient> {
        Arc::new(BackendClient::new(server.uri()))
    }

    #[tokio::test]
    async fn test_current_visitors_sentence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/visitors/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current_visitors": 42,
                "timestamp": "2026-08-04T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let tool = CurrentVisitorsTool::new(backend(&server).await);
        let outcome = tool.execute(json!({})).await;
        assert_eq!(
            outcome,
            ToolOutcome::reply("There are currently 42 visitors in the store.")
        );
    }

    #[tokio::test]
    async fn test_busiest_section_reads_element_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/visitors/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"section": "electronics", "total_visitors": 120, "records_count": 8},
                {"section": "groceries", "total_visitors": 95, "records_count": 11}
            ])))
            .mount(&server)
            .await;

        let tool = BusiestSectionTool::new(backend(&server).await);
        let outcome = tool.execute(json!({})).await;
        let ToolOutcome::Reply(sentence) = outcome else {
            panic!("expected a reply");
        };
        assert!(sentence.contains("electronics"));
        assert!(sentence.contains("120"));
    }

    #[tokio::test]
    async fn test_busiest_section_empty_is_still_a_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/visitors/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let tool = BusiestSectionTool::new(backend(&server).await);
        let outcome = tool.execute(json!({})).await;
        assert!(!outcome.is_failed(), "empty data is not a failure");
    }

    #[tokio::test]
    async fn test_cashier_queue_uses_wait_heuristic_when_unmeasured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cashier/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "queue_length": 5,
                "status": "busy",
                "timestamp": "2026-08-04T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let tool = CashierQueueTool::new(backend(&server).await);
        let outcome = tool.execute(json!({})).await;
        let ToolOutcome::Reply(sentence) = outcome else {
            panic!("expected a reply");
        };
        // 5 people, no measured wait: the shared heuristic gives 10 minutes
        assert!(sentence.contains("5 people"));
        assert!(sentence.contains("10 minutes"));
    }

    #[tokio::test]
    async fn test_cashier_queue_prefers_measured_wait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cashier/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "queue_length": 5,
                "wait_time_minutes": 7.0,
                "status": "normal",
                "timestamp": "2026-08-04T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let tool = CashierQueueTool::new(backend(&server).await);
        let ToolOutcome::Reply(sentence) = tool.execute(json!({})).await else {
            panic!("expected a reply");
        };
        assert!(sentence.contains("7 minutes"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_a_failed_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/visitors/current"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database exploded"))
            .mount(&server)
            .await;

        let tool = CurrentVisitorsTool::new(backend(&server).await);
        let outcome = tool.execute(json!({})).await;
        assert!(outcome.is_failed());

        let rendered = outcome.render();
        assert!(rendered.contains("I'm sorry"));
        assert!(rendered.contains("500"));
    }
}

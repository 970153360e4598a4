// Typed client for the Storepulse analytics API
//
// Only the three endpoints the tools need. Non-2xx answers become errors
// carrying the status and body so the tool layer can surface the cause.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use storepulse_core::{CashierStatus, SectionTraffic};

/// Connect + first-byte timeout for backend calls
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Total request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of GET /api/visitors/current
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentVisitors {
    pub current_visitors: i64,
}

/// GET /api/cashier/current answers either a snapshot or a no-data
/// placeholder; both are 200
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurrentCashierBody {
    Status(CashierStatus),
    NoData { message: String },
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/visitors/current
    pub async fn current_visitors(&self) -> Result<CurrentVisitors> {
        self.get_json("/api/visitors/current").await
    }

    /// GET /api/visitors/sections, ordered busiest first; element 0 is
    /// the busiest section
    pub async fn section_traffic(&self) -> Result<Vec<SectionTraffic>> {
        self.get_json("/api/visitors/sections").await
    }

    /// GET /api/cashier/current; None when the store has no snapshots yet
    pub async fn current_cashier(&self) -> Result<Option<CashierStatus>> {
        let body: CurrentCashierBody = self.get_json("/api/cashier/current").await?;
        Ok(match body {
            CurrentCashierBody::Status(status) => Some(status),
            CurrentCashierBody::NoData { message } => {
                tracing::debug!(%message, "no cashier snapshot available");
                None
            }
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("backend returned {} for {}: {}", status, url, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("failed to decode response from {}", url))
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_current_cashier_parses_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cashier/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "queue_length": 4,
                "status": "busy",
                "timestamp": "2026-08-04T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let status = client.current_cashier().await.unwrap().expect("snapshot");
        assert_eq!(status.queue_length, 4);
        assert!(status.wait_time_minutes.is_none());
    }

    #[tokio::test]
    async fn test_current_cashier_no_data_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cashier/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "No cashier data available",
                "timestamp": "2026-08-04T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        assert!(client.current_cashier().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_error_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/visitors/current"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})),
            )
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.current_visitors().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}

// Health and service-info endpoints
//
// The health check reports connectivity, table presence, and row counts.
// A failing check answers 200 with a degraded body embedding the error, so
// probes can distinguish "unreachable store" from "unreachable API".

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use storepulse_storage::Database;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableCounts {
    pub visitors: i64,
    pub cashier: i64,
    pub heatmap: i64,
    pub predictions: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<TableCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub docs: String,
    #[schema(value_type = Object)]
    pub endpoints: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// GET / - Service identity and endpoint index
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service identity and endpoint index", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Storepulse Analytics API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        docs: "/docs".to_string(),
        endpoints: serde_json::json!({
            "visitors": "/api/visitors/",
            "cashier": "/api/cashier/current",
            "heatmap": "/api/heatmap/",
            "predictions": "/api/predictions/",
            "health": "/health"
        }),
        timestamp: Utc::now(),
    })
}

/// GET /health - Store connectivity, table presence, row counts
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Healthy, or degraded with the error embedded", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let checks = async {
        let tables = state.db.available_tables().await?;
        let counts = state.db.table_counts().await?;
        anyhow::Ok((tables, counts))
    }
    .await;

    Json(match checks {
        Ok((tables, counts)) => HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            tables,
            records: Some(TableCounts {
                visitors: counts.visitors_records,
                cashier: counts.cashier_records,
                heatmap: counts.heatmap_records,
                predictions: counts.predictions_records,
            }),
            error: None,
            timestamp: Utc::now(),
        },
        Err(err) => {
            tracing::error!("health check failed: {:#}", err);
            HealthResponse {
                status: "degraded".to_string(),
                database: "unreachable".to_string(),
                tables: Vec::new(),
                records: None,
                error: Some(format!("{:#}", err)),
                timestamp: Utc::now(),
            }
        }
    })
}

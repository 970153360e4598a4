// Cashier HTTP routes
//
// "No cashier data yet" is a 200 with a placeholder body on /current and
// /wait-time, not an error.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use storepulse_core::{BusyPeriod, CashierStatus, QueueSample};
use storepulse_storage::Database;

use crate::common::{NoData, WaitTime};
use crate::error::{check_range, ApiResult};
use crate::services::CashierService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CashierService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(CashierService::new(db)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cashier/current", get(current_status))
        .route("/api/cashier/history", get(queue_history))
        .route("/api/cashier/busy-periods", get(busy_periods))
        .route("/api/cashier/wait-time", get(wait_time))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub hours: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct BusyPeriodsQuery {
    pub threshold: Option<i32>,
}

/// GET /api/cashier/current - Most recent queue snapshot
#[utoipa::path(
    get,
    path = "/api/cashier/current",
    responses(
        (status = 200, description = "Latest snapshot, or a placeholder when none exists", body = CashierStatus),
        (status = 500, description = "Database error")
    ),
    tag = "cashier"
)]
pub async fn current_status(State(state): State<AppState>) -> ApiResult<Response> {
    let status = state.service.current().await?;
    Ok(match status {
        Some(status) => Json(status).into_response(),
        None => Json(NoData::new("No cashier data available")).into_response(),
    })
}

/// GET /api/cashier/history - Snapshots in the trailing window
#[utoipa::path(
    get,
    path = "/api/cashier/history",
    params(
        ("hours" = Option<i32>, Query, description = "Window size in hours (1-168, default 6)")
    ),
    responses(
        (status = 200, description = "Snapshots, oldest first", body = Vec<QueueSample>),
        (status = 422, description = "Parameter out of range"),
        (status = 500, description = "Database error")
    ),
    tag = "cashier"
)]
pub async fn queue_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<QueueSample>>> {
    let hours = check_range("hours", query.hours.unwrap_or(6), 1, 168)?;
    let samples = state.service.history(hours).await?;
    Ok(Json(samples))
}

/// GET /api/cashier/busy-periods - Recurring high-traffic hours
#[utoipa::path(
    get,
    path = "/api/cashier/busy-periods",
    params(
        ("threshold" = Option<i32>, Query, description = "Average queue length a bucket must exceed (1-20, default 3)")
    ),
    responses(
        (status = 200, description = "Hour buckets over the threshold, worst first", body = Vec<BusyPeriod>),
        (status = 422, description = "Parameter out of range"),
        (status = 500, description = "Database error")
    ),
    tag = "cashier"
)]
pub async fn busy_periods(
    State(state): State<AppState>,
    Query(query): Query<BusyPeriodsQuery>,
) -> ApiResult<Json<Vec<BusyPeriod>>> {
    let threshold = check_range("threshold", query.threshold.unwrap_or(3), 1, 20)?;
    let periods = state.service.busy_periods(threshold).await?;
    Ok(Json(periods))
}

/// GET /api/cashier/wait-time - Estimated wait from the latest snapshot
#[utoipa::path(
    get,
    path = "/api/cashier/wait-time",
    responses(
        (status = 200, description = "Estimated wait, or a placeholder when no snapshot exists", body = WaitTime),
        (status = 500, description = "Database error")
    ),
    tag = "cashier"
)]
pub async fn wait_time(State(state): State<AppState>) -> ApiResult<Response> {
    let status = state.service.current().await?;
    Ok(match status {
        Some(status) => Json(WaitTime {
            estimated_wait_minutes: status.estimated_wait_minutes(),
            queue_length: status.queue_length,
            timestamp: Utc::now(),
        })
        .into_response(),
        None => Json(serde_json::json!({
            "estimated_wait_minutes": 0,
            "message": "No data"
        }))
        .into_response(),
    })
}

// Visitor HTTP routes

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use storepulse_core::{DailySummary, SectionTraffic, VisitorRecord};
use storepulse_storage::Database;
use utoipa::ToSchema;

use crate::common::CurrentVisitors;
use crate::error::{check_range, ApiError, ApiResult};
use crate::services::{AnalyticsService, PredictionService, VisitorService};

/// App state for visitor routes (daily analytics lives under this prefix)
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VisitorService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        let predictions = Arc::new(PredictionService::new(db.clone()));
        Self {
            service: Arc::new(VisitorService::new(db.clone())),
            analytics: Arc::new(AnalyticsService::new(db, predictions)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/visitors/", get(list_visitors))
        .route("/api/visitors/current", get(current_visitors))
        .route("/api/visitors/sections", get(section_traffic))
        .route("/api/visitors/analytics/daily", get(daily_summary))
        .route("/api/visitors/range", post(visitors_by_range))
        .route("/api/visitors/{visitor_id}", get(get_visitor))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Time range for POST /api/visitors/range; end defaults to now
#[derive(Debug, Deserialize, ToSchema)]
pub struct TimeRange {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// GET /api/visitors/ - Most recent visitor records
#[utoipa::path(
    get,
    path = "/api/visitors/",
    params(
        ("limit" = Option<i64>, Query, description = "Max records to return (1-1000, default 100)"),
        ("offset" = Option<i64>, Query, description = "Records to skip (default 0)")
    ),
    responses(
        (status = 200, description = "Visitor records, most recent first", body = Vec<VisitorRecord>),
        (status = 422, description = "Parameter out of range"),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn list_visitors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<VisitorRecord>>> {
    let limit = check_range("limit", query.limit.unwrap_or(100), 1, 1000)?;
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::validation("offset must be non-negative"));
    }

    let records = state.service.list(limit, offset).await?;
    Ok(Json(records))
}

/// GET /api/visitors/current - Visitor count over the last 15 minutes
#[utoipa::path(
    get,
    path = "/api/visitors/current",
    responses(
        (status = 200, description = "Current visitor count", body = CurrentVisitors),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn current_visitors(
    State(state): State<AppState>,
) -> ApiResult<Json<CurrentVisitors>> {
    let count = state.service.current_count().await?;
    Ok(Json(CurrentVisitors {
        current_visitors: count,
        timestamp: Utc::now(),
    }))
}

/// GET /api/visitors/sections - Per-section traffic, busiest first
#[utoipa::path(
    get,
    path = "/api/visitors/sections",
    responses(
        (status = 200, description = "Sections ordered busiest first", body = Vec<SectionTraffic>),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn section_traffic(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SectionTraffic>>> {
    let sections = state.service.section_traffic().await?;
    Ok(Json(sections))
}

/// GET /api/visitors/analytics/daily - Daily summary
#[utoipa::path(
    get,
    path = "/api/visitors/analytics/daily",
    responses(
        (status = 200, description = "Summary since midnight UTC", body = DailySummary),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn daily_summary(State(state): State<AppState>) -> ApiResult<Json<DailySummary>> {
    let summary = state.analytics.daily_summary().await?;
    Ok(Json(summary))
}

/// POST /api/visitors/range - Records within an inclusive time range
#[utoipa::path(
    post,
    path = "/api/visitors/range",
    request_body = TimeRange,
    responses(
        (status = 200, description = "Records in range, ascending", body = Vec<VisitorRecord>),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn visitors_by_range(
    State(state): State<AppState>,
    Json(range): Json<TimeRange>,
) -> ApiResult<Json<Vec<VisitorRecord>>> {
    let end = range.end_time.unwrap_or_else(Utc::now);
    let records = state.service.by_range(range.start_time, end).await?;
    Ok(Json(records))
}

/// GET /api/visitors/{visitor_id} - Single record by id
#[utoipa::path(
    get,
    path = "/api/visitors/{visitor_id}",
    params(
        ("visitor_id" = i64, Path, description = "Visitor record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = VisitorRecord),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Database error")
    ),
    tag = "visitors"
)]
pub async fn get_visitor(
    State(state): State<AppState>,
    Path(visitor_id): Path<i64>,
) -> ApiResult<Json<VisitorRecord>> {
    let record = state
        .service
        .get(visitor_id)
        .await?
        .ok_or(ApiError::NotFound("Visitor record not found"))?;

    Ok(Json(record))
}

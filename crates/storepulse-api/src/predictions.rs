// Prediction HTTP routes
//
// A miss on the exact (metric, horizon) lookup is a 200 with a message
// body; forecasts being absent is an expected state, not an error.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use storepulse_core::{MetricType, PredictionRecord, TrafficForecast, FORECAST_HORIZONS};
use storepulse_storage::Database;

use crate::common::NoData;
use crate::error::{ApiError, ApiResult};
use crate::services::{AnalyticsService, PredictionService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        let service = Arc::new(PredictionService::new(db.clone()));
        Self {
            analytics: Arc::new(AnalyticsService::new(db, service.clone())),
            service,
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/predictions/", get(latest_forecasts))
        .route("/api/predictions/metric/{metric_type}", get(metric_forecast))
        .route("/api/predictions/traffic/forecast", get(traffic_forecast))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub horizon: Option<String>,
}

/// GET /api/predictions/ - Most recent forecast per (metric, horizon)
#[utoipa::path(
    get,
    path = "/api/predictions/",
    responses(
        (status = 200, description = "Latest forecast for every metric/horizon pair", body = Vec<PredictionRecord>),
        (status = 500, description = "Database error")
    ),
    tag = "predictions"
)]
pub async fn latest_forecasts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PredictionRecord>>> {
    let forecasts = state.service.latest_forecasts().await?;
    Ok(Json(forecasts))
}

/// GET /api/predictions/metric/{metric_type} - Exact metric/horizon lookup
#[utoipa::path(
    get,
    path = "/api/predictions/metric/{metric_type}",
    params(
        ("metric_type" = String, Path, description = "Metric: visitors, cashier_queue, or conversions"),
        ("horizon" = Option<String>, Query, description = "Forecast horizon token (1h, 4h, 8h, 1d, 7d; default 1h)")
    ),
    responses(
        (status = 200, description = "Most recent matching forecast, or a placeholder when none exists", body = PredictionRecord),
        (status = 422, description = "Unknown metric type or horizon"),
        (status = 500, description = "Database error")
    ),
    tag = "predictions"
)]
pub async fn metric_forecast(
    State(state): State<AppState>,
    Path(metric_type): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Response> {
    let metric = MetricType::parse(&metric_type).ok_or_else(|| {
        ApiError::validation("metric_type must be one of: visitors, cashier_queue, conversions")
    })?;
    let horizon = query.horizon.unwrap_or_else(|| "1h".to_string());
    if !FORECAST_HORIZONS.contains(&horizon.as_str()) {
        return Err(ApiError::validation(format!(
            "horizon must be one of: {}",
            FORECAST_HORIZONS.join(", ")
        )));
    }

    let forecast = state.service.metric_forecast(metric, &horizon).await?;
    Ok(match forecast {
        Some(record) => Json(record).into_response(),
        None => Json(NoData::new(format!(
            "No {} forecast available for horizon {}",
            metric, horizon
        )))
        .into_response(),
    })
}

/// GET /api/predictions/traffic/forecast - 4-hour outlook with recommendation
#[utoipa::path(
    get,
    path = "/api/predictions/traffic/forecast",
    responses(
        (status = 200, description = "Visitor and queue forecasts plus a staffing recommendation", body = TrafficForecast),
        (status = 500, description = "Database error")
    ),
    tag = "predictions"
)]
pub async fn traffic_forecast(State(state): State<AppState>) -> ApiResult<Json<TrafficForecast>> {
    let forecast = state.analytics.traffic_forecast().await?;
    Ok(Json(forecast))
}

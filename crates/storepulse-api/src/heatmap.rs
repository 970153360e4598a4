// Heatmap HTTP routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use storepulse_core::{DensityAnalysis, DensityLevel, HeatmapSample};
use storepulse_storage::Database;

use crate::error::{ApiError, ApiResult};
use crate::services::HeatmapService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HeatmapService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(HeatmapService::new(db)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/heatmap/", get(latest_heatmap))
        .route("/api/heatmap/analysis", get(density_analysis))
        .route("/api/heatmap/density/{level}", get(by_density))
        .with_state(state)
}

/// GET /api/heatmap/ - Most recent sample per section
#[utoipa::path(
    get,
    path = "/api/heatmap/",
    responses(
        (status = 200, description = "Latest sample for every section", body = Vec<HeatmapSample>),
        (status = 500, description = "Database error")
    ),
    tag = "heatmap"
)]
pub async fn latest_heatmap(State(state): State<AppState>) -> ApiResult<Json<Vec<HeatmapSample>>> {
    let samples = state.service.latest().await?;
    Ok(Json(samples))
}

/// GET /api/heatmap/analysis - Density distribution over the trailing hour
#[utoipa::path(
    get,
    path = "/api/heatmap/analysis",
    responses(
        (status = 200, description = "Counts per density level and average visitor count", body = DensityAnalysis),
        (status = 500, description = "Database error")
    ),
    tag = "heatmap"
)]
pub async fn density_analysis(State(state): State<AppState>) -> ApiResult<Json<DensityAnalysis>> {
    let analysis = state.service.analysis().await?;
    Ok(Json(analysis))
}

/// GET /api/heatmap/density/{level} - Latest-per-section samples at one level
#[utoipa::path(
    get,
    path = "/api/heatmap/density/{level}",
    params(
        ("level" = String, Path, description = "Density level: high, medium, or low")
    ),
    responses(
        (status = 200, description = "Sections currently at the requested level", body = Vec<HeatmapSample>),
        (status = 422, description = "Unknown density level"),
        (status = 500, description = "Database error")
    ),
    tag = "heatmap"
)]
pub async fn by_density(
    State(state): State<AppState>,
    Path(level): Path<String>,
) -> ApiResult<Json<Vec<HeatmapSample>>> {
    let level = DensityLevel::parse(&level).ok_or_else(|| {
        ApiError::validation("density level must be one of: high, medium, low")
    })?;

    let samples = state.service.by_level(level).await?;
    Ok(Json(samples))
}

// Database models (internal, mapped to core records by the service layer)

use chrono::{DateTime, Utc};
use sqlx::FromRow;

// ============================================
// Visitor models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct VisitorRow {
    pub id: i64,
    pub section: String,
    pub count: i32,
    pub gender_distribution: Option<sqlx::types::JsonValue>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateVisitor {
    pub section: String,
    pub count: i32,
    pub gender_distribution: Option<serde_json::Value>,
}

/// Per-section aggregate over the trailing 24 hours
#[derive(Debug, Clone, FromRow)]
pub struct SectionTrafficRow {
    pub section: String,
    pub total_visitors: i64,
    pub records_count: i64,
}

// ============================================
// Cashier models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct CashierRow {
    pub id: i64,
    pub queue_length: i32,
    pub wait_time_minutes: Option<f64>,
    pub transactions_count: Option<i32>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCashierStatus {
    pub queue_length: i32,
    pub wait_time_minutes: Option<f64>,
    pub transactions_count: Option<i32>,
    pub status: String,
}

/// Trimmed projection used by the queue-history endpoint
#[derive(Debug, Clone, FromRow)]
pub struct QueueHistoryRow {
    pub timestamp: DateTime<Utc>,
    pub queue_length: i32,
    pub status: String,
    pub wait_time_minutes: Option<f64>,
}

/// One hour bucket whose average queue length cleared the threshold
#[derive(Debug, Clone, FromRow)]
pub struct BusyPeriodRow {
    pub hour_start: DateTime<Utc>,
    pub avg_queue: f64,
    pub max_queue: i32,
}

// ============================================
// Heatmap models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct HeatmapRow {
    pub id: i64,
    pub section: String,
    pub density_level: String,
    pub coordinates: Option<sqlx::types::JsonValue>,
    pub visitor_count: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateHeatmapSample {
    pub section: String,
    pub density_level: String,
    pub coordinates: Option<serde_json::Value>,
    pub visitor_count: i32,
}

/// Density-level counts over the trailing hour; avg_visitors is NULL when
/// the window holds no samples
#[derive(Debug, Clone, FromRow)]
pub struct DensityAnalysisRow {
    pub high_count: i64,
    pub medium_count: i64,
    pub low_count: i64,
    pub avg_visitors: Option<f64>,
}

// ============================================
// Prediction models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct PredictionRow {
    pub id: i64,
    pub metric_type: String,
    pub predicted_value: f64,
    pub confidence_level: f64,
    pub forecast_horizon: String,
    pub prediction_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePrediction {
    pub metric_type: String,
    pub predicted_value: f64,
    pub confidence_level: f64,
    pub forecast_horizon: String,
    pub prediction_timestamp: DateTime<Utc>,
}

// ============================================
// Health models
// ============================================

/// Row counts across all four fact tables, fetched in one round trip
#[derive(Debug, Clone, FromRow)]
pub struct TableCountsRow {
    pub visitors_records: i64,
    pub cashier_records: i64,
    pub heatmap_records: i64,
    pub predictions_records: i64,
}

/// Server identity reported by the smoke-check binary
#[derive(Debug, Clone, FromRow)]
pub struct ServerInfoRow {
    pub version: String,
    pub database: String,
    pub username: String,
}

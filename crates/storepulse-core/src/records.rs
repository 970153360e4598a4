// Record types for the four fact tables
//
// Rows are immutable once written; "current" state is always derived from
// the most recent rows in a trailing window, never from in-place updates.
// Enum-valued columns are stored as text; unknown stored text maps to a
// default variant rather than an error (stored data is outside our control).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Minutes of queue wait attributed to each queued person when a snapshot
/// carries no measured wait time.
pub const WAIT_MINUTES_PER_PERSON: f64 = 2.0;

/// Estimated wait in minutes for a queue of the given length.
///
/// The single authority for the wait-time heuristic: both the
/// `/api/cashier/wait-time` endpoint and the assistant's cashier tool go
/// through this (directly or via [`CashierStatus::estimated_wait_minutes`]).
pub fn estimate_wait_minutes(queue_length: i32) -> f64 {
    queue_length as f64 * WAIT_MINUTES_PER_PERSON
}

/// Cashier queue state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CashierState {
    Busy,
    Normal,
    Idle,
}

impl std::fmt::Display for CashierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashierState::Busy => write!(f, "busy"),
            CashierState::Normal => write!(f, "normal"),
            CashierState::Idle => write!(f, "idle"),
        }
    }
}

impl From<&str> for CashierState {
    fn from(s: &str) -> Self {
        match s {
            "busy" => CashierState::Busy,
            "idle" => CashierState::Idle,
            _ => CashierState::Normal,
        }
    }
}

/// Coarse three-bucket classification of spatial visitor concentration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    High,
    Medium,
    Low,
}

impl DensityLevel {
    /// Parse a path/query token. Unlike the stored-column conversion this is
    /// strict: user input with a bad token is a validation failure.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(DensityLevel::High),
            "medium" => Some(DensityLevel::Medium),
            "low" => Some(DensityLevel::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for DensityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DensityLevel::High => write!(f, "high"),
            DensityLevel::Medium => write!(f, "medium"),
            DensityLevel::Low => write!(f, "low"),
        }
    }
}

impl From<&str> for DensityLevel {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or(DensityLevel::Low)
    }
}

/// Forecast metric identity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Visitors,
    CashierQueue,
    Conversions,
}

impl MetricType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "visitors" => Some(MetricType::Visitors),
            "cashier_queue" => Some(MetricType::CashierQueue),
            "conversions" => Some(MetricType::Conversions),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Visitors => "visitors",
            MetricType::CashierQueue => "cashier_queue",
            MetricType::Conversions => "conversions",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for MetricType {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or(MetricType::Visitors)
    }
}

/// Forecast horizon tokens accepted on the API surface
pub const FORECAST_HORIZONS: &[&str] = &["1h", "4h", "8h", "1d", "7d"];

/// One visitor-count observation for a store section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VisitorRecord {
    pub id: i64,
    pub section: String,
    pub count: i32,
    /// Category → headcount breakdown, when the camera pipeline produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_distribution: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time snapshot of the cashier queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CashierStatus {
    pub id: i64,
    pub queue_length: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_time_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions_count: Option<i32>,
    pub status: CashierState,
    pub timestamp: DateTime<Utc>,
}

impl CashierStatus {
    /// Measured wait time when the snapshot has one, otherwise the shared
    /// per-person heuristic.
    pub fn estimated_wait_minutes(&self) -> f64 {
        self.wait_time_minutes
            .unwrap_or_else(|| estimate_wait_minutes(self.queue_length))
    }
}

/// One spatial density observation for a store section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HeatmapSample {
    pub id: i64,
    pub section: String,
    pub density_level: DensityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<serde_json::Value>,
    pub visitor_count: i32,
    pub timestamp: DateTime<Utc>,
}

/// A stored forecast, produced elsewhere and only ever read here
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PredictionRecord {
    pub id: i64,
    pub metric_type: MetricType,
    pub predicted_value: f64,
    pub confidence_level: f64,
    pub forecast_horizon: String,
    pub prediction_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(queue_length: i32, wait_time_minutes: Option<f64>) -> CashierStatus {
        CashierStatus {
            id: 1,
            queue_length,
            wait_time_minutes,
            transactions_count: None,
            status: CashierState::Normal,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_wait_estimate_falls_back_to_heuristic() {
        let status = snapshot(5, None);
        assert_eq!(status.estimated_wait_minutes(), 10.0);
    }

    #[test]
    fn test_wait_estimate_prefers_measured_value() {
        let status = snapshot(5, Some(7.5));
        assert_eq!(status.estimated_wait_minutes(), 7.5);
    }

    #[test]
    fn test_wait_estimate_empty_queue_is_zero() {
        assert_eq!(estimate_wait_minutes(0), 0.0);
    }

    #[test]
    fn test_cashier_state_from_str() {
        assert_eq!(CashierState::from("busy"), CashierState::Busy);
        assert_eq!(CashierState::from("idle"), CashierState::Idle);
        // Unknown stored text falls back rather than erroring
        assert_eq!(CashierState::from("???"), CashierState::Normal);
    }

    #[test]
    fn test_density_level_parse_is_strict() {
        assert_eq!(DensityLevel::parse("high"), Some(DensityLevel::High));
        assert_eq!(DensityLevel::parse("HIGH"), None);
        assert_eq!(DensityLevel::parse("extreme"), None);
    }

    #[test]
    fn test_metric_type_round_trip() {
        for token in ["visitors", "cashier_queue", "conversions"] {
            let metric = MetricType::parse(token).unwrap();
            assert_eq!(metric.as_str(), token);
        }
        assert_eq!(MetricType::parse("revenue"), None);
    }

    #[test]
    fn test_metric_type_serde_tokens() {
        let json = serde_json::to_string(&MetricType::CashierQueue).unwrap();
        assert_eq!(json, "\"cashier_queue\"");
    }
}

// Derived analytics types and the rules that produce them
//
// The daily summary and traffic forecast are composed from several
// independent aggregate queries; each query can legitimately return no
// rows, and each absence maps to an explicit default ("N/A", zero) here
// rather than a propagated null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::records::{CashierState, PredictionRecord};

pub const RECOMMEND_OPEN_LANES: &str = "Consider opening additional cashier lanes";
pub const RECOMMEND_RESTOCK: &str = "Good time for restocking and maintenance";
pub const RECOMMEND_NORMAL: &str = "Normal operations recommended";
pub const RECOMMEND_INSUFFICIENT: &str = "Insufficient data for recommendation";

/// Per-section visitor totals over the trailing 24 hours.
///
/// Lists of these are ordered descending by `total_visitors`; the busiest
/// section is element 0. Downstream consumers rely on that ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SectionTraffic {
    pub section: String,
    pub total_visitors: i64,
    pub records_count: i64,
}

/// Density-level counts and mean visitor count over the trailing hour.
/// Levels with no samples report zero, not an absent key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DensityAnalysis {
    pub high_count: i64,
    pub medium_count: i64,
    pub low_count: i64,
    pub avg_visitors: f64,
}

/// One point of queue history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct QueueSample {
    pub timestamp: DateTime<Utc>,
    pub queue_length: i32,
    pub status: CashierState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_time_minutes: Option<f64>,
}

/// An hour of day whose average queue length cleared the caller's threshold,
/// over the trailing 7 days
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BusyPeriod {
    pub hour_start: DateTime<Utc>,
    pub avg_queue: f64,
    pub max_queue: i32,
}

/// Store-wide summary from midnight UTC to now
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DailySummary {
    pub total_visitors_today: i64,
    pub busiest_section: String,
    pub avg_queue_length: f64,
    /// Hour of day with the most visitors, formatted "H:00"
    pub peak_hour: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl DailySummary {
    /// Compose the summary from the four independent aggregates, mapping
    /// each absence to its default.
    pub fn compose(
        total_visitors: Option<i64>,
        busiest_section: Option<String>,
        avg_queue_length: Option<f64>,
        peak_hour: Option<i32>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            total_visitors_today: total_visitors.unwrap_or(0),
            busiest_section: busiest_section.unwrap_or_else(|| "N/A".to_string()),
            avg_queue_length: round1(avg_queue_length.unwrap_or(0.0)),
            peak_hour: peak_hour
                .map(|h| format!("{}:00", h))
                .unwrap_or_else(|| "N/A".to_string()),
            conversion_rate: None,
            timestamp,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Combined 4-hour outlook with a staffing recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TrafficForecast {
    pub visitors_forecast: Option<PredictionRecord>,
    pub queue_forecast: Option<PredictionRecord>,
    pub recommendation: String,
}

impl TrafficForecast {
    pub fn new(
        visitors_forecast: Option<PredictionRecord>,
        queue_forecast: Option<PredictionRecord>,
    ) -> Self {
        let recommendation = recommend(
            visitors_forecast.as_ref().map(|p| p.predicted_value),
            queue_forecast.as_ref().map(|p| p.predicted_value),
        )
        .to_string();
        Self {
            visitors_forecast,
            queue_forecast,
            recommendation,
        }
    }
}

/// Threshold rules mapping the 4-hour forecasts to a recommendation.
///
/// Missing either forecast yields the insufficient-data message regardless
/// of the other value.
pub fn recommend(predicted_visitors: Option<f64>, predicted_queue: Option<f64>) -> &'static str {
    let (visitors, queue) = match (predicted_visitors, predicted_queue) {
        (Some(v), Some(q)) => (v, q),
        _ => return RECOMMEND_INSUFFICIENT,
    };

    if visitors > 50.0 && queue > 4.0 {
        RECOMMEND_OPEN_LANES
    } else if visitors < 10.0 {
        RECOMMEND_RESTOCK
    } else {
        RECOMMEND_NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_open_lanes() {
        assert_eq!(recommend(Some(60.0), Some(5.0)), RECOMMEND_OPEN_LANES);
    }

    #[test]
    fn test_recommend_restock_on_low_traffic() {
        assert_eq!(recommend(Some(5.0), Some(1.0)), RECOMMEND_RESTOCK);
    }

    #[test]
    fn test_recommend_normal_in_between() {
        assert_eq!(recommend(Some(30.0), Some(2.0)), RECOMMEND_NORMAL);
    }

    #[test]
    fn test_recommend_boundaries_are_exclusive() {
        // Exactly 50 visitors / queue of 4 does not trigger extra lanes
        assert_eq!(recommend(Some(50.0), Some(5.0)), RECOMMEND_NORMAL);
        assert_eq!(recommend(Some(60.0), Some(4.0)), RECOMMEND_NORMAL);
        // Exactly 10 visitors is not a restock window
        assert_eq!(recommend(Some(10.0), Some(0.0)), RECOMMEND_NORMAL);
    }

    #[test]
    fn test_recommend_missing_forecast_wins() {
        assert_eq!(recommend(None, Some(9.0)), RECOMMEND_INSUFFICIENT);
        assert_eq!(recommend(Some(60.0), None), RECOMMEND_INSUFFICIENT);
        assert_eq!(recommend(None, None), RECOMMEND_INSUFFICIENT);
    }

    #[test]
    fn test_daily_summary_all_absent_maps_to_defaults() {
        let now = Utc::now();
        let summary = DailySummary::compose(None, None, None, None, now);
        assert_eq!(summary.total_visitors_today, 0);
        assert_eq!(summary.busiest_section, "N/A");
        assert_eq!(summary.avg_queue_length, 0.0);
        assert_eq!(summary.peak_hour, "N/A");
        assert!(summary.conversion_rate.is_none());
    }

    #[test]
    fn test_daily_summary_rounds_queue_to_one_decimal() {
        let now = Utc::now();
        let summary = DailySummary::compose(Some(120), Some("produce".into()), Some(3.14), Some(14), now);
        assert_eq!(summary.avg_queue_length, 3.1);
        assert_eq!(summary.peak_hour, "14:00");
        assert_eq!(summary.busiest_section, "produce");
    }

    #[test]
    fn test_traffic_forecast_recommendation_from_records() {
        let prediction = |metric: crate::records::MetricType, value: f64| PredictionRecord {
            id: 1,
            metric_type: metric,
            predicted_value: value,
            confidence_level: 0.9,
            forecast_horizon: "4h".to_string(),
            prediction_timestamp: Utc::now(),
            created_at: Utc::now(),
        };

        let forecast = TrafficForecast::new(
            Some(prediction(crate::records::MetricType::Visitors, 60.0)),
            Some(prediction(crate::records::MetricType::CashierQueue, 5.0)),
        );
        assert_eq!(forecast.recommendation, RECOMMEND_OPEN_LANES);

        let forecast = TrafficForecast::new(None, Some(prediction(crate::records::MetricType::CashierQueue, 5.0)));
        assert_eq!(forecast.recommendation, RECOMMEND_INSUFFICIENT);
    }
}

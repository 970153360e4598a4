// Aggregation composer
//
// The daily summary issues four independent aggregate queries rather than
// one joined query: each can legitimately return no rows, and each absence
// maps to an explicit default instead of a propagated null.

use anyhow::Result;
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use storepulse_core::{DailySummary, MetricType, TrafficForecast};
use storepulse_storage::Database;

use super::PredictionService;

/// Horizon used for the combined traffic outlook
const FORECAST_WINDOW: &str = "4h";

pub struct AnalyticsService {
    db: Arc<Database>,
    predictions: Arc<PredictionService>,
}

impl AnalyticsService {
    pub fn new(db: Arc<Database>, predictions: Arc<PredictionService>) -> Self {
        Self { db, predictions }
    }

    /// Store-wide summary from midnight UTC of the current day to now.
    pub async fn daily_summary(&self) -> Result<DailySummary> {
        let now = Utc::now();
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let total_visitors = self.db.total_visitors_since(day_start).await?;
        let busiest_section = self.db.busiest_section_since(day_start).await?;
        let avg_queue = self.db.avg_queue_length_since(day_start).await?;
        let peak_hour = self.db.peak_hour_since(day_start).await?;

        Ok(DailySummary::compose(
            total_visitors,
            busiest_section,
            avg_queue,
            peak_hour,
            now,
        ))
    }

    /// 4-hour visitor and queue forecasts plus the staffing recommendation.
    pub async fn traffic_forecast(&self) -> Result<TrafficForecast> {
        let visitors = self
            .predictions
            .metric_forecast(MetricType::Visitors, FORECAST_WINDOW)
            .await?;
        let queue = self
            .predictions
            .metric_forecast(MetricType::CashierQueue, FORECAST_WINDOW)
            .await?;

        Ok(TrafficForecast::new(visitors, queue))
    }
}

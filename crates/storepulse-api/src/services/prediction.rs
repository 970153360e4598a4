// Prediction query service
//
// Forecasts are produced by an external process; this service only reads
// the most recent row per (metric, horizon) key.

use anyhow::Result;
use std::sync::Arc;
use storepulse_core::{MetricType, PredictionRecord};
use storepulse_storage::{Database, PredictionRow};

pub struct PredictionService {
    db: Arc<Database>,
}

impl PredictionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn latest_forecasts(&self) -> Result<Vec<PredictionRecord>> {
        let rows = self.db.latest_forecasts().await?;
        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    pub async fn metric_forecast(
        &self,
        metric_type: MetricType,
        horizon: &str,
    ) -> Result<Option<PredictionRecord>> {
        let row = self
            .db
            .metric_forecast(metric_type.as_str(), horizon)
            .await?;
        Ok(row.map(Self::row_to_record))
    }

    fn row_to_record(row: PredictionRow) -> PredictionRecord {
        PredictionRecord {
            id: row.id,
            metric_type: MetricType::from(row.metric_type.as_str()),
            predicted_value: row.predicted_value,
            confidence_level: row.confidence_level,
            forecast_horizon: row.forecast_horizon,
            prediction_timestamp: row.prediction_timestamp,
            created_at: row.created_at,
        }
    }
}

// Repository layer for database operations
//
// One method per query the API issues. Trailing windows ("now minus N
// units") are evaluated in SQL on every call; the daily-summary midnight
// boundary is computed by the caller and bound, so it can be pinned in
// tests.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Create a handle whose connections are established on first use.
    /// Lets tests build routers and exercise validation paths without a
    /// reachable database.
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Visitors
    // ============================================

    /// Most recent records first, at most `limit` of them.
    pub async fn list_visitors(&self, limit: i64, offset: i64) -> Result<Vec<VisitorRow>> {
        let rows = sqlx::query_as::<_, VisitorRow>(
            r#"
            SELECT id, section, count, gender_distribution, timestamp
            FROM visitors
            ORDER BY timestamp DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_visitor(&self, id: i64) -> Result<Option<VisitorRow>> {
        let row = sqlx::query_as::<_, VisitorRow>(
            r#"
            SELECT id, section, count, gender_distribution, timestamp
            FROM visitors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Sum of counts over the trailing 15 minutes. An empty window reads as
    /// zero traffic, not as unknown.
    pub async fn current_visitor_count(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(count), 0)::BIGINT
            FROM visitors
            WHERE timestamp > NOW() - INTERVAL '15 minutes'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Inclusive range, ascending by timestamp.
    pub async fn visitors_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<VisitorRow>> {
        let rows = sqlx::query_as::<_, VisitorRow>(
            r#"
            SELECT id, section, count, gender_distribution, timestamp
            FROM visitors
            WHERE timestamp BETWEEN $1 AND $2
            ORDER BY timestamp
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-section totals over the trailing 24 hours, busiest first.
    /// The descending order is a contract: consumers read element 0 as the
    /// busiest section.
    pub async fn section_traffic(&self) -> Result<Vec<SectionTrafficRow>> {
        let rows = sqlx::query_as::<_, SectionTrafficRow>(
            r#"
            SELECT section,
                   SUM(count)::BIGINT AS total_visitors,
                   COUNT(*) AS records_count
            FROM visitors
            WHERE timestamp > NOW() - INTERVAL '24 hours'
            GROUP BY section
            ORDER BY total_visitors DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create_visitor(&self, input: CreateVisitor) -> Result<VisitorRow> {
        let row = sqlx::query_as::<_, VisitorRow>(
            r#"
            INSERT INTO visitors (section, count, gender_distribution)
            VALUES ($1, $2, $3)
            RETURNING id, section, count, gender_distribution, timestamp
            "#,
        )
        .bind(&input.section)
        .bind(input.count)
        .bind(&input.gender_distribution)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Cashier
    // ============================================

    pub async fn current_cashier_status(&self) -> Result<Option<CashierRow>> {
        let row = sqlx::query_as::<_, CashierRow>(
            r#"
            SELECT id, queue_length, wait_time_minutes, transactions_count, status, timestamp
            FROM cashier
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Snapshots in the trailing `hours` window, oldest first.
    pub async fn queue_history(&self, hours: i32) -> Result<Vec<QueueHistoryRow>> {
        let rows = sqlx::query_as::<_, QueueHistoryRow>(
            r#"
            SELECT timestamp, queue_length, status, wait_time_minutes
            FROM cashier
            WHERE timestamp > NOW() - make_interval(hours => $1)
            ORDER BY timestamp
            "#,
        )
        .bind(hours)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Hour buckets over the trailing 7 days whose average queue length
    /// exceeds `threshold`, worst first.
    pub async fn busy_periods(&self, threshold: i32) -> Result<Vec<BusyPeriodRow>> {
        let rows = sqlx::query_as::<_, BusyPeriodRow>(
            r#"
            SELECT DATE_TRUNC('hour', timestamp) AS hour_start,
                   AVG(queue_length)::FLOAT8 AS avg_queue,
                   MAX(queue_length) AS max_queue
            FROM cashier
            WHERE timestamp > NOW() - INTERVAL '7 days'
            GROUP BY DATE_TRUNC('hour', timestamp)
            HAVING AVG(queue_length) > $1
            ORDER BY avg_queue DESC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create_cashier_status(&self, input: CreateCashierStatus) -> Result<CashierRow> {
        let row = sqlx::query_as::<_, CashierRow>(
            r#"
            INSERT INTO cashier (queue_length, wait_time_minutes, transactions_count, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, queue_length, wait_time_minutes, transactions_count, status, timestamp
            "#,
        )
        .bind(input.queue_length)
        .bind(input.wait_time_minutes)
        .bind(input.transactions_count)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Heatmap
    // ============================================

    /// One row per section, whichever is most recent.
    pub async fn latest_heatmap(&self) -> Result<Vec<HeatmapRow>> {
        let rows = sqlx::query_as::<_, HeatmapRow>(
            r#"
            SELECT DISTINCT ON (section)
                   id, section, density_level, coordinates, visitor_count, timestamp
            FROM heatmap
            ORDER BY section, timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Density-level counts and mean visitor count over the trailing hour.
    /// FILTER keeps levels with no samples at zero instead of dropping them.
    pub async fn density_analysis(&self) -> Result<DensityAnalysisRow> {
        let row = sqlx::query_as::<_, DensityAnalysisRow>(
            r#"
            SELECT COUNT(*) FILTER (WHERE density_level = 'high')   AS high_count,
                   COUNT(*) FILTER (WHERE density_level = 'medium') AS medium_count,
                   COUNT(*) FILTER (WHERE density_level = 'low')    AS low_count,
                   AVG(visitor_count)::FLOAT8                       AS avg_visitors
            FROM heatmap
            WHERE timestamp > NOW() - INTERVAL '1 hour'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_heatmap_sample(&self, input: CreateHeatmapSample) -> Result<HeatmapRow> {
        let row = sqlx::query_as::<_, HeatmapRow>(
            r#"
            INSERT INTO heatmap (section, density_level, coordinates, visitor_count)
            VALUES ($1, $2, $3, $4)
            RETURNING id, section, density_level, coordinates, visitor_count, timestamp
            "#,
        )
        .bind(&input.section)
        .bind(&input.density_level)
        .bind(&input.coordinates)
        .bind(input.visitor_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Predictions
    // ============================================

    /// One row per (metric_type, forecast_horizon), most recent prediction.
    pub async fn latest_forecasts(&self) -> Result<Vec<PredictionRow>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT DISTINCT ON (metric_type, forecast_horizon)
                   id, metric_type, predicted_value, confidence_level,
                   forecast_horizon, prediction_timestamp, created_at
            FROM predictions
            ORDER BY metric_type, forecast_horizon, prediction_timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn metric_forecast(
        &self,
        metric_type: &str,
        horizon: &str,
    ) -> Result<Option<PredictionRow>> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, metric_type, predicted_value, confidence_level,
                   forecast_horizon, prediction_timestamp, created_at
            FROM predictions
            WHERE metric_type = $1 AND forecast_horizon = $2
            ORDER BY prediction_timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(metric_type)
        .bind(horizon)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_prediction(&self, input: CreatePrediction) -> Result<PredictionRow> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            INSERT INTO predictions (metric_type, predicted_value, confidence_level,
                                     forecast_horizon, prediction_timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, metric_type, predicted_value, confidence_level,
                      forecast_horizon, prediction_timestamp, created_at
            "#,
        )
        .bind(&input.metric_type)
        .bind(input.predicted_value)
        .bind(input.confidence_level)
        .bind(&input.forecast_horizon)
        .bind(input.prediction_timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Daily-summary aggregates
    // ============================================
    // Four independent queries; each can return no rows, and the composer
    // maps each absence to its default.

    /// SUM is NULL when the day holds no rows; the caller decides what
    /// absence means.
    pub async fn total_visitors_since(&self, since: DateTime<Utc>) -> Result<Option<i64>> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(count)::BIGINT
            FROM visitors
            WHERE timestamp >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn busiest_section_since(&self, since: DateTime<Utc>) -> Result<Option<String>> {
        let section: Option<String> = sqlx::query_scalar(
            r#"
            SELECT section
            FROM visitors
            WHERE timestamp >= $1
            GROUP BY section
            ORDER BY SUM(count) DESC
            LIMIT 1
            "#,
        )
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;

        Ok(section)
    }

    pub async fn avg_queue_length_since(&self, since: DateTime<Utc>) -> Result<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(queue_length)::FLOAT8
            FROM cashier
            WHERE timestamp >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(avg)
    }

    /// Hour of day with the most visitors since `since`.
    pub async fn peak_hour_since(&self, since: DateTime<Utc>) -> Result<Option<i32>> {
        let hour: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT EXTRACT(HOUR FROM timestamp)::INT
            FROM visitors
            WHERE timestamp >= $1
            GROUP BY EXTRACT(HOUR FROM timestamp)
            ORDER BY SUM(count) DESC
            LIMIT 1
            "#,
        )
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hour)
    }

    // ============================================
    // Health
    // ============================================

    /// Names of the expected fact tables that actually exist.
    pub async fn available_tables(&self) -> Result<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::TEXT
            FROM information_schema.tables
            WHERE table_schema = 'public'
              AND table_name IN ('visitors', 'cashier', 'heatmap', 'predictions')
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    pub async fn table_counts(&self) -> Result<TableCountsRow> {
        let row = sqlx::query_as::<_, TableCountsRow>(
            r#"
            SELECT (SELECT COUNT(*) FROM visitors)    AS visitors_records,
                   (SELECT COUNT(*) FROM cashier)     AS cashier_records,
                   (SELECT COUNT(*) FROM heatmap)     AS heatmap_records,
                   (SELECT COUNT(*) FROM predictions) AS predictions_records
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Server identity, used by the smoke-check binary.
    pub async fn server_info(&self) -> Result<ServerInfoRow> {
        let row = sqlx::query_as::<_, ServerInfoRow>(
            r#"
            SELECT version() AS version,
                   current_database()::TEXT AS database,
                   current_user::TEXT AS username
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

// Core domain types for Storepulse
//
// Records mirror the four fact tables; analytics holds the pure rules
// shared by the API layer and the assistant (wait-time heuristic,
// forecast recommendation, daily summary defaults).

pub mod analytics;
pub mod records;

pub use analytics::{
    recommend, BusyPeriod, DailySummary, DensityAnalysis, QueueSample, SectionTraffic,
    TrafficForecast, RECOMMEND_INSUFFICIENT, RECOMMEND_NORMAL, RECOMMEND_OPEN_LANES,
    RECOMMEND_RESTOCK,
};
pub use records::{
    estimate_wait_minutes, CashierState, CashierStatus, DensityLevel, HeatmapSample, MetricType,
    PredictionRecord, VisitorRecord, FORECAST_HORIZONS,
};

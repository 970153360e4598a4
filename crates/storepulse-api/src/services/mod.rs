// Service layer: row-to-record mapping and the aggregation composer

mod analytics;
mod cashier;
mod heatmap;
mod prediction;
mod visitor;

pub use analytics::AnalyticsService;
pub use cashier::CashierService;
pub use heatmap::HeatmapService;
pub use prediction::PredictionService;
pub use visitor::VisitorService;

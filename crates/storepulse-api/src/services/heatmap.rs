// Heatmap query service

use anyhow::Result;
use std::sync::Arc;
use storepulse_core::{DensityAnalysis, DensityLevel, HeatmapSample};
use storepulse_storage::{Database, HeatmapRow};

pub struct HeatmapService {
    db: Arc<Database>,
}

impl HeatmapService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Most recent sample for every section.
    pub async fn latest(&self) -> Result<Vec<HeatmapSample>> {
        let rows = self.db.latest_heatmap().await?;
        Ok(rows.into_iter().map(Self::row_to_sample).collect())
    }

    /// An empty trailing hour reports zero counts and a zero average.
    pub async fn analysis(&self) -> Result<DensityAnalysis> {
        let row = self.db.density_analysis().await?;
        Ok(DensityAnalysis {
            high_count: row.high_count,
            medium_count: row.medium_count,
            low_count: row.low_count,
            avg_visitors: row.avg_visitors.unwrap_or(0.0),
        })
    }

    /// Filters the latest-per-section set in memory; the set is bounded by
    /// the number of store sections, so a second query isn't worth it.
    pub async fn by_level(&self, level: DensityLevel) -> Result<Vec<HeatmapSample>> {
        let latest = self.latest().await?;
        Ok(latest
            .into_iter()
            .filter(|sample| sample.density_level == level)
            .collect())
    }

    fn row_to_sample(row: HeatmapRow) -> HeatmapSample {
        HeatmapSample {
            id: row.id,
            section: row.section,
            density_level: DensityLevel::from(row.density_level.as_str()),
            coordinates: row.coordinates,
            visitor_count: row.visitor_count,
            timestamp: row.timestamp,
        }
    }
}

// Visitor query service

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use storepulse_core::{SectionTraffic, VisitorRecord};
use storepulse_storage::{Database, SectionTrafficRow, VisitorRow};

pub struct VisitorService {
    db: Arc<Database>,
}

impl VisitorService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<VisitorRecord>> {
        let rows = self.db.list_visitors(limit, offset).await?;
        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Option<VisitorRecord>> {
        let row = self.db.get_visitor(id).await?;
        Ok(row.map(Self::row_to_record))
    }

    /// Trailing 15-minute total. No recent rows reads as zero traffic.
    pub async fn current_count(&self) -> Result<i64> {
        self.db.current_visitor_count().await
    }

    pub async fn by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<VisitorRecord>> {
        let rows = self.db.visitors_by_range(start, end).await?;
        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    /// Busiest first; consumers read element 0.
    pub async fn section_traffic(&self) -> Result<Vec<SectionTraffic>> {
        let rows = self.db.section_traffic().await?;
        Ok(rows.into_iter().map(Self::row_to_traffic).collect())
    }

    fn row_to_record(row: VisitorRow) -> VisitorRecord {
        VisitorRecord {
            id: row.id,
            section: row.section,
            count: row.count,
            gender_distribution: row.gender_distribution,
            timestamp: row.timestamp,
        }
    }

    fn row_to_traffic(row: SectionTrafficRow) -> SectionTraffic {
        SectionTraffic {
            section: row.section,
            total_visitors: row.total_visitors,
            records_count: row.records_count,
        }
    }
}

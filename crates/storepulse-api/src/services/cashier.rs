// Cashier query service

use anyhow::Result;
use std::sync::Arc;
use storepulse_core::{BusyPeriod, CashierState, CashierStatus, QueueSample};
use storepulse_storage::{BusyPeriodRow, CashierRow, Database, QueueHistoryRow};

pub struct CashierService {
    db: Arc<Database>,
}

impl CashierService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn current(&self) -> Result<Option<CashierStatus>> {
        let row = self.db.current_cashier_status().await?;
        Ok(row.map(Self::row_to_status))
    }

    pub async fn history(&self, hours: i32) -> Result<Vec<QueueSample>> {
        let rows = self.db.queue_history(hours).await?;
        Ok(rows.into_iter().map(Self::row_to_sample).collect())
    }

    pub async fn busy_periods(&self, threshold: i32) -> Result<Vec<BusyPeriod>> {
        let rows = self.db.busy_periods(threshold).await?;
        Ok(rows.into_iter().map(Self::row_to_period).collect())
    }

    fn row_to_status(row: CashierRow) -> CashierStatus {
        CashierStatus {
            id: row.id,
            queue_length: row.queue_length,
            wait_time_minutes: row.wait_time_minutes,
            transactions_count: row.transactions_count,
            status: CashierState::from(row.status.as_str()),
            timestamp: row.timestamp,
        }
    }

    fn row_to_sample(row: QueueHistoryRow) -> QueueSample {
        QueueSample {
            timestamp: row.timestamp,
            queue_length: row.queue_length,
            status: CashierState::from(row.status.as_str()),
            wait_time_minutes: row.wait_time_minutes,
        }
    }

    fn row_to_period(row: BusyPeriodRow) -> BusyPeriod {
        BusyPeriod {
            hour_start: row.hour_start,
            avg_queue: row.avg_queue,
            max_queue: row.max_queue,
        }
    }
}

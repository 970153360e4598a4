// Common DTOs for the public API
//
// Endpoints whose aggregate can legitimately be empty answer 200 with a
// NoData body rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current visitor count over the trailing 15 minutes. Zero means no recent
/// activity, not "unknown".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentVisitors {
    pub current_visitors: i64,
    pub timestamp: DateTime<Utc>,
}

/// Placeholder body for current-status endpoints with nothing to report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoData {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NoData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Estimated wait derived from the most recent queue snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WaitTime {
    pub estimated_wait_minutes: f64,
    pub queue_length: i32,
    pub timestamp: DateTime<Utc>,
}

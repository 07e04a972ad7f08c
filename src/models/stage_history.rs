use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the append-only stage ledger. `stage_name` is denormalized at
/// write time so historical aggregation by name survives stage renames and
/// deletions. `exited_at = NULL` marks the candidate's current residency;
/// `duration_hours` is computed exactly once when the entry is closed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StageHistoryEntry {
    pub id: Uuid,
    pub job_candidate_id: Uuid,
    pub stage_id: Uuid,
    pub stage_name: String,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub comment: Option<String>,
    pub moved_by: Option<Uuid>,
}

impl StageHistoryEntry {
    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }
}

/// Millisecond-exact hour difference between entry and exit, clamped to zero
/// when the timestamps arrive out of order.
pub fn duration_hours_between(entered_at: DateTime<Utc>, exited_at: DateTime<Utc>) -> f64 {
    ((exited_at - entered_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

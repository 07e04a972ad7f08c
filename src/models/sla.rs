use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fallback threshold for stages with no configured SLA.
pub const DEFAULT_SLA_THRESHOLD_DAYS: i64 = 30;

/// Days-to-breach window that marks a candidate as at risk before an actual
/// breach (threshold - 3 < days <= threshold).
pub const SLA_AT_RISK_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlaConfig {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Matched case-insensitively against the candidate's current stage name.
    pub stage_name: String,
    pub threshold_days: i32,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const ACTIVITY_STAGE_CHANGE: &str = "stage_change";
pub const ACTIVITY_APPLICATION: &str = "application";
pub const ACTIVITY_NOTE: &str = "note";

/// Append-only candidate timeline record, written as a side effect of stage
/// changes, auto-rejection, feedback and notes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateActivity {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_candidate_id: Option<Uuid>,
    pub activity_type: String,
    pub description: String,
    pub metadata: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

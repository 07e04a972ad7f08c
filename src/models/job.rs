use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Closed,
}

/// Semantic marker of a pipeline stage, decoupled from its display name.
/// Jobs rename stages freely; the analytics and automation layers key off
/// the role, so "Talent Pool" and "Applied" can both be the intake queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stage_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StageRole {
    Queue,
    Intermediate,
    Offer,
    Hired,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub department: Option<String>,
    /// Legacy single-location field, still honoured by location filters.
    pub location: Option<String>,
    pub locations: Option<Vec<String>>,
    pub status: JobStatus,
    pub openings: i32,
    pub assigned_recruiter_id: Option<Uuid>,
    pub auto_rejection_rules: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Case-insensitive match against the legacy field or the location list.
    pub fn matches_location(&self, wanted: &str) -> bool {
        let wanted = wanted.trim().to_lowercase();
        if let Some(ref loc) = self.location {
            if loc.trim().to_lowercase() == wanted {
                return true;
            }
        }
        if let Some(ref list) = self.locations {
            if list.iter().any(|l| l.trim().to_lowercase() == wanted) {
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PipelineStage {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub position: i32,
    pub stage_role: StageRole,
}

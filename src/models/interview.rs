use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "interview_status", rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "feedback_recommendation", rename_all = "snake_case")]
pub enum Recommendation {
    StrongHire,
    Hire,
    Neutral,
    NoHire,
    StrongNoHire,
}

impl Recommendation {
    pub fn is_reject(&self) -> bool {
        matches!(self, Recommendation::NoHire | Recommendation::StrongNoHire)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub job_candidate_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub status: InterviewStatus,
    pub interviewer_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewFeedback {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub panelist_id: Uuid,
    pub recommendation: Recommendation,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

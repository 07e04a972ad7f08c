use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience_years: Option<f64>,
    pub location: Option<String>,
    pub education: Option<String>,
    pub skills: Option<Vec<String>>,
    pub salary_expectation: Option<Decimal>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobCandidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub current_stage_id: Uuid,
    pub applied_at: DateTime<Utc>,
    /// Timestamp of the most recent stage change. Doubles as the hire/offer
    /// timestamp proxy in the analytics layer.
    pub updated_at: DateTime<Utc>,
}

use serde_json::Value as JsonValue;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::activity::CandidateActivity;

const ACTIVITY_COLUMNS: &str =
    "id, candidate_id, job_candidate_id, activity_type, description, metadata, created_at";

/// Append-only candidate timeline, written as a side effect of stage changes
/// and rule-engine decisions.
#[derive(Clone)]
pub struct ActivityService {
    pool: PgPool,
}

impl ActivityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn log_on(
        conn: &mut PgConnection,
        candidate_id: Uuid,
        job_candidate_id: Option<Uuid>,
        activity_type: &str,
        description: &str,
        metadata: Option<JsonValue>,
    ) -> Result<CandidateActivity> {
        let activity = sqlx::query_as::<_, CandidateActivity>(&format!(
            "INSERT INTO candidate_activities (candidate_id, job_candidate_id, activity_type, description, metadata) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(candidate_id)
        .bind(job_candidate_id)
        .bind(activity_type)
        .bind(description)
        .bind(metadata)
        .fetch_one(&mut *conn)
        .await?;
        Ok(activity)
    }

    pub async fn log(
        &self,
        candidate_id: Uuid,
        job_candidate_id: Option<Uuid>,
        activity_type: &str,
        description: &str,
        metadata: Option<JsonValue>,
    ) -> Result<CandidateActivity> {
        let mut conn = self.pool.acquire().await?;
        Self::log_on(
            &mut conn,
            candidate_id,
            job_candidate_id,
            activity_type,
            description,
            metadata,
        )
        .await
    }

    pub async fn timeline(&self, candidate_id: Uuid) -> Result<Vec<CandidateActivity>> {
        let activities = sqlx::query_as::<_, CandidateActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM candidate_activities \
             WHERE candidate_id = $1 ORDER BY created_at DESC"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }
}

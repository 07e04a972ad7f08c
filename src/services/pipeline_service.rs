use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::activity::{ACTIVITY_APPLICATION, ACTIVITY_STAGE_CHANGE};
use crate::models::candidate::{Candidate, JobCandidate};
use crate::models::job::{PipelineStage, StageRole};
use crate::models::rules::AutoRejectionRules;
use crate::services::activity_service::ActivityService;
use crate::services::rejection_service::{CandidateProfile, RejectionService};
use crate::services::stage_history_service::StageHistoryService;

const APPLICATION_COLUMNS: &str =
    "id, job_id, candidate_id, current_stage_id, applied_at, updated_at";
const STAGE_COLUMNS: &str = "id, job_id, name, position, stage_role";
const CANDIDATE_COLUMNS: &str = "id, company_id, name, email, phone, experience_years, location, \
     education, skills, salary_expectation, source, created_at, updated_at";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationOutcome {
    pub application: JobCandidate,
    pub auto_rejected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRowFailure {
    pub index: usize,
    pub candidate_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub submitted: Vec<ApplicationOutcome>,
    pub failed: Vec<BulkRowFailure>,
}

/// Orchestrates stage transitions. Every move is one transaction: close the
/// open ledger entry, open the new one, advance the application's stage
/// pointer, and append the activity record. The `FOR UPDATE` lock on the
/// application row serializes concurrent moves so the at-most-one-open-entry
/// invariant holds under racing requests.
#[derive(Clone)]
pub struct PipelineService {
    pool: PgPool,
}

impl PipelineService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn move_candidate_stage(
        &self,
        job_candidate_id: Uuid,
        to_stage_id: Uuid,
        comment: Option<&str>,
        moved_by: Option<Uuid>,
    ) -> Result<JobCandidate> {
        let mut tx = self.pool.begin().await?;

        let app = sqlx::query_as::<_, JobCandidate>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_candidates WHERE id = $1 FOR UPDATE"
        ))
        .bind(job_candidate_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Application {} not found", job_candidate_id)))?;

        let to_stage = sqlx::query_as::<_, PipelineStage>(&format!(
            "SELECT {STAGE_COLUMNS} FROM pipeline_stages WHERE id = $1"
        ))
        .bind(to_stage_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Stage {} not found", to_stage_id)))?;
        if to_stage.job_id != app.job_id {
            return Err(Error::BadRequest(
                "Target stage belongs to a different job".to_string(),
            ));
        }

        let from_stage_name: Option<(String,)> =
            sqlx::query_as("SELECT name FROM pipeline_stages WHERE id = $1")
                .bind(app.current_stage_id)
                .fetch_optional(&mut *tx)
                .await?;

        StageHistoryService::close_stage_entry_on(
            &mut *tx,
            job_candidate_id,
            app.current_stage_id,
            None,
        )
        .await?;
        StageHistoryService::create_stage_entry_on(
            &mut *tx,
            job_candidate_id,
            to_stage.id,
            &to_stage.name,
            comment,
            moved_by,
        )
        .await?;

        let updated = sqlx::query_as::<_, JobCandidate>(&format!(
            "UPDATE job_candidates SET current_stage_id = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(to_stage.id)
        .bind(job_candidate_id)
        .fetch_one(&mut *tx)
        .await?;

        let from_name = from_stage_name.map(|(n,)| n).unwrap_or_default();
        ActivityService::log_on(
            &mut *tx,
            app.candidate_id,
            Some(job_candidate_id),
            ACTIVITY_STAGE_CHANGE,
            &format!("Moved from {} to {}", from_name, to_stage.name),
            Some(json!({
                "fromStageName": from_name,
                "toStageName": to_stage.name,
                "comment": comment,
            })),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Creates the application at the job's queue-role stage and runs
    /// auto-rejection before commit, so intake and rejection are atomic.
    pub async fn submit_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<ApplicationOutcome> {
        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(candidate_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;

        let queue_stage = sqlx::query_as::<_, PipelineStage>(&format!(
            "SELECT {STAGE_COLUMNS} FROM pipeline_stages \
             WHERE job_id = $1 AND stage_role = $2 ORDER BY position LIMIT 1"
        ))
        .bind(job_id)
        .bind(StageRole::Queue)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::BadRequest(format!("Job {} has no queue stage", job_id)))?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM job_candidates WHERE job_id = $1 AND candidate_id = $2",
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "Candidate has already applied to this job".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, JobCandidate>(&format!(
            "INSERT INTO job_candidates (job_id, candidate_id, current_stage_id) \
             VALUES ($1, $2, $3) RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(job_id)
        .bind(candidate_id)
        .bind(queue_stage.id)
        .fetch_one(&mut *tx)
        .await?;

        StageHistoryService::create_stage_entry_on(
            &mut *tx,
            application.id,
            queue_stage.id,
            &queue_stage.name,
            None,
            None,
        )
        .await?;

        ActivityService::log_on(
            &mut *tx,
            candidate_id,
            Some(application.id),
            ACTIVITY_APPLICATION,
            "Application submitted",
            Some(json!({ "jobId": job_id })),
        )
        .await?;

        let profile = CandidateProfile::from(&candidate);
        let auto_rejected = RejectionService::process_auto_rejection_on(
            &mut *tx,
            application.id,
            candidate_id,
            &profile,
            job_id,
        )
        .await?;

        tx.commit().await?;
        Ok(ApplicationOutcome {
            application,
            auto_rejected,
        })
    }

    /// Sequential intake: one candidate's failure is isolated and reported,
    /// never aborting the rest of the batch.
    pub async fn bulk_submit(&self, rows: &[(Uuid, Uuid)]) -> BulkOutcome {
        let mut submitted = Vec::new();
        let mut failed = Vec::new();
        for (index, (job_id, candidate_id)) in rows.iter().enumerate() {
            match self.submit_application(*job_id, *candidate_id).await {
                Ok(outcome) => submitted.push(outcome),
                Err(err) => {
                    tracing::warn!(%candidate_id, error = %err, "bulk intake row failed");
                    failed.push(BulkRowFailure {
                        index,
                        candidate_id: *candidate_id,
                        error: err.to_string(),
                    });
                }
            }
        }
        BulkOutcome { submitted, failed }
    }

    pub async fn get_rules(&self, job_id: Uuid) -> Result<Option<AutoRejectionRules>> {
        let row: Option<(Option<serde_json::Value>,)> =
            sqlx::query_as("SELECT auto_rejection_rules FROM jobs WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        let Some((rules_json,)) = row else {
            return Err(Error::NotFound(format!("Job {} not found", job_id)));
        };
        Ok(rules_json.map(serde_json::from_value).transpose()?)
    }

    pub async fn update_rules(&self, job_id: Uuid, rules: &AutoRejectionRules) -> Result<()> {
        let result = sqlx::query(
            "UPDATE jobs SET auto_rejection_rules = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(serde_json::to_value(rules)?)
        .bind(job_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Job {} not found", job_id)));
        }
        Ok(())
    }
}

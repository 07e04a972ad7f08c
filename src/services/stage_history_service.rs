use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::stage_history::{duration_hours_between, StageHistoryEntry};

const ENTRY_COLUMNS: &str =
    "id, job_candidate_id, stage_id, stage_name, entered_at, exited_at, duration_hours, comment, moved_by";

/// Append-only stage ledger. The `*_on` functions take an explicit connection
/// so stage-move orchestration can run them inside one transaction; the
/// inherent methods are pool-backed conveniences for read paths.
#[derive(Clone)]
pub struct StageHistoryService {
    pool: PgPool,
}

impl StageHistoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a new ledger entry with `entered_at = now`. The stage name is
    /// denormalized onto the row so later renames don't corrupt history.
    /// No open-entry uniqueness check happens here: the caller is responsible
    /// for closing the prior entry first, inside the same transaction.
    pub async fn create_stage_entry_on(
        conn: &mut PgConnection,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        stage_name: &str,
        comment: Option<&str>,
        moved_by: Option<Uuid>,
    ) -> Result<StageHistoryEntry> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM job_candidates WHERE id = $1")
            .bind(job_candidate_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound(format!(
                "Application {} not found",
                job_candidate_id
            )));
        }

        let entry = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "INSERT INTO stage_history (job_candidate_id, stage_id, stage_name, comment, moved_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(job_candidate_id)
        .bind(stage_id)
        .bind(stage_name)
        .bind(comment)
        .bind(moved_by)
        .fetch_one(&mut *conn)
        .await?;
        Ok(entry)
    }

    /// Closes the most recent open entry for (application, stage), computing
    /// `duration_hours` exactly once. Returns `None` when no open entry
    /// exists, which is the case for a candidate's first-ever stage entry.
    pub async fn close_stage_entry_on(
        conn: &mut PgConnection,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        exited_at: Option<DateTime<Utc>>,
    ) -> Result<Option<StageHistoryEntry>> {
        let open = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM stage_history \
             WHERE job_candidate_id = $1 AND stage_id = $2 AND exited_at IS NULL \
             ORDER BY entered_at DESC LIMIT 1"
        ))
        .bind(job_candidate_id)
        .bind(stage_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(entry) = open else {
            return Ok(None);
        };

        let exited_at = exited_at.unwrap_or_else(Utc::now);
        let duration_hours = duration_hours_between(entry.entered_at, exited_at);

        let updated = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "UPDATE stage_history SET exited_at = $1, duration_hours = $2 \
             WHERE id = $3 RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(exited_at)
        .bind(duration_hours)
        .bind(entry.id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(Some(updated))
    }

    pub async fn create_stage_entry(
        &self,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        stage_name: &str,
        comment: Option<&str>,
        moved_by: Option<Uuid>,
    ) -> Result<StageHistoryEntry> {
        let mut conn = self.pool.acquire().await?;
        Self::create_stage_entry_on(
            &mut conn,
            job_candidate_id,
            stage_id,
            stage_name,
            comment,
            moved_by,
        )
        .await
    }

    pub async fn close_stage_entry(
        &self,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        exited_at: Option<DateTime<Utc>>,
    ) -> Result<Option<StageHistoryEntry>> {
        let mut conn = self.pool.acquire().await?;
        Self::close_stage_entry_on(&mut conn, job_candidate_id, stage_id, exited_at).await
    }

    /// Full ledger for one application, ascending by entry time. Strict:
    /// unknown applications are an error, unlike the lenient rejection path.
    pub async fn get_stage_history(&self, job_candidate_id: Uuid) -> Result<Vec<StageHistoryEntry>> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM job_candidates WHERE id = $1")
            .bind(job_candidate_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound(format!(
                "Application {} not found",
                job_candidate_id
            )));
        }

        let entries = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM stage_history \
             WHERE job_candidate_id = $1 ORDER BY entered_at ASC"
        ))
        .bind(job_candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Ledger entries across all of a candidate's applications.
    pub async fn get_stage_history_by_candidate_id(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<StageHistoryEntry>> {
        let entries = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "SELECT sh.{} FROM stage_history sh \
             JOIN job_candidates jc ON jc.id = sh.job_candidate_id \
             WHERE jc.candidate_id = $1 ORDER BY sh.entered_at ASC",
            ENTRY_COLUMNS.replace(", ", ", sh.")
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// The open entry (current residency), or `None`.
    pub async fn get_current_stage_entry(
        &self,
        job_candidate_id: Uuid,
    ) -> Result<Option<StageHistoryEntry>> {
        let entry = sqlx::query_as::<_, StageHistoryEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM stage_history \
             WHERE job_candidate_id = $1 AND exited_at IS NULL \
             ORDER BY entered_at DESC LIMIT 1"
        ))
        .bind(job_candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }
}

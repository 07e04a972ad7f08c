use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::conversion::{conversion_rates, StageConversion};
use crate::analytics::dropoff::{drop_off_analysis, DropOffAnalysis};
use crate::analytics::funnel::{funnel_analytics, FunnelAnalytics};
use crate::analytics::kpi::{kpi_metrics, KpiMetrics};
use crate::analytics::offer::{offer_acceptance, OfferAcceptance};
use crate::analytics::panel::{panel_performance, PanelMemberPerformance};
use crate::analytics::recruiter::{recruiter_productivity, RecruiterProductivity};
use crate::analytics::rejection_reasons::{rejection_reasons, RejectionReasonReport};
use crate::analytics::scope::{Actor, ReportFilters};
use crate::analytics::source::{source_performance, SourcePerformance};
use crate::analytics::time_in_stage::{time_in_stage, TimeInStageReport};
use crate::analytics::time_to_fill::{time_to_fill, TimeToFill};
use crate::analytics::{CompanySnapshot, ScopeView};
use crate::error::Result;
use crate::models::candidate::{Candidate, JobCandidate};
use crate::models::interview::{Interview, InterviewFeedback};
use crate::models::job::{Job, PipelineStage};
use crate::models::sla::SlaConfig;
use crate::models::stage_history::StageHistoryEntry;
use crate::models::user::User;

/// Loads one company's rows in a single pass. The aggregation itself is the
/// pure `analytics` module; reads are deliberately not transactional with
/// regard to writes (dashboards tolerate slightly stale aggregates).
pub async fn load_company_snapshot(pool: &PgPool, company_id: Uuid) -> Result<CompanySnapshot> {
    let jobs = sqlx::query_as::<_, Job>(
        "SELECT id, company_id, title, department, location, locations, status, openings, \
                assigned_recruiter_id, auto_rejection_rules, created_at, updated_at \
         FROM jobs WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let stages = sqlx::query_as::<_, PipelineStage>(
        "SELECT s.id, s.job_id, s.name, s.position, s.stage_role \
         FROM pipeline_stages s JOIN jobs j ON j.id = s.job_id \
         WHERE j.company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let applications = sqlx::query_as::<_, JobCandidate>(
        "SELECT a.id, a.job_id, a.candidate_id, a.current_stage_id, a.applied_at, a.updated_at \
         FROM job_candidates a JOIN jobs j ON j.id = a.job_id \
         WHERE j.company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let candidates = sqlx::query_as::<_, Candidate>(
        "SELECT id, company_id, name, email, phone, experience_years, location, education, \
                skills, salary_expectation, source, created_at, updated_at \
         FROM candidates WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let history = sqlx::query_as::<_, StageHistoryEntry>(
        "SELECT h.id, h.job_candidate_id, h.stage_id, h.stage_name, h.entered_at, h.exited_at, \
                h.duration_hours, h.comment, h.moved_by \
         FROM stage_history h \
         JOIN job_candidates a ON a.id = h.job_candidate_id \
         JOIN jobs j ON j.id = a.job_id \
         WHERE j.company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let interviews = sqlx::query_as::<_, Interview>(
        "SELECT i.id, i.job_candidate_id, i.scheduled_at, i.status, i.interviewer_ids, i.created_at \
         FROM interviews i \
         JOIN job_candidates a ON a.id = i.job_candidate_id \
         JOIN jobs j ON j.id = a.job_id \
         WHERE j.company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let feedback = sqlx::query_as::<_, InterviewFeedback>(
        "SELECT f.id, f.interview_id, f.panelist_id, f.recommendation, f.comment, f.submitted_at \
         FROM interview_feedback f \
         JOIN interviews i ON i.id = f.interview_id \
         JOIN job_candidates a ON a.id = i.job_candidate_id \
         JOIN jobs j ON j.id = a.job_id \
         WHERE j.company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let users = sqlx::query_as::<_, User>(
        "SELECT id, company_id, name, email, role, is_active, created_at \
         FROM users WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let sla_configs = sqlx::query_as::<_, SlaConfig>(
        "SELECT id, company_id, stage_name, threshold_days \
         FROM sla_configs WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    Ok(CompanySnapshot {
        jobs,
        stages,
        applications,
        candidates,
        history,
        interviews,
        feedback,
        users,
        sla_configs,
    })
}

/// One method per dashboard report; each fetches the company snapshot and
/// delegates to the pure aggregation layer.
#[derive(Clone)]
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn snapshot(&self, actor: &Actor) -> Result<CompanySnapshot> {
        load_company_snapshot(&self.pool, actor.company_id).await
    }

    pub async fn get_kpi_metrics(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<KpiMetrics> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(kpi_metrics(&view, &filters, crate::utils::time::now()))
    }

    pub async fn get_funnel_analytics(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<FunnelAnalytics> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(funnel_analytics(&view, &filters))
    }

    pub async fn get_conversion_rates(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<Vec<StageConversion>> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(conversion_rates(&view, &filters))
    }

    pub async fn get_time_to_fill(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<TimeToFill> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(time_to_fill(&view, &filters))
    }

    pub async fn get_time_in_stage(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<TimeInStageReport> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(time_in_stage(&view, &filters))
    }

    pub async fn get_source_performance(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<Vec<SourcePerformance>> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(source_performance(&view, &filters))
    }

    pub async fn get_recruiter_productivity(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<Vec<RecruiterProductivity>> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(recruiter_productivity(&view, &actor, &filters))
    }

    pub async fn get_panel_performance(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<Vec<PanelMemberPerformance>> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(panel_performance(&view, &filters))
    }

    pub async fn get_drop_off_analysis(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<DropOffAnalysis> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(drop_off_analysis(&view, &filters))
    }

    pub async fn get_rejection_reasons(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<RejectionReasonReport> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(rejection_reasons(&view, &filters))
    }

    pub async fn get_offer_acceptance_rate(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<OfferAcceptance> {
        let snapshot = self.snapshot(&actor).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(offer_acceptance(&view, &filters))
    }
}

use sqlx::PgPool;

use crate::analytics::scope::{Actor, ReportFilters};
use crate::analytics::sla::{sla_status, SlaStatusReport};
use crate::analytics::ScopeView;
use crate::error::Result;
use crate::services::analytics_service::load_company_snapshot;

/// Standalone entry point for the SLA classifier; the KPI summary reuses the
/// same pure computation as a sub-aggregate.
#[derive(Clone)]
pub struct SlaService {
    pool: PgPool,
}

impl SlaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_sla_status_summary(
        &self,
        actor: Actor,
        filters: ReportFilters,
    ) -> Result<SlaStatusReport> {
        let snapshot = load_company_snapshot(&self.pool, actor.company_id).await?;
        let view = ScopeView::build(&snapshot, &actor, &filters);
        Ok(sla_status(&view, crate::utils::time::now()))
    }
}

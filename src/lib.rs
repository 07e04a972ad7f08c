pub mod analytics;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::middleware::auth::{InMemoryRevocationStore, RevocationStore};
use crate::services::{
    activity_service::ActivityService, analytics_service::AnalyticsService,
    pipeline_service::PipelineService, sla_service::SlaService,
    stage_history_service::StageHistoryService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub analytics_service: AnalyticsService,
    pub pipeline_service: PipelineService,
    pub stage_history_service: StageHistoryService,
    pub activity_service: ActivityService,
    pub sla_service: SlaService,
    pub revocation: Arc<dyn RevocationStore>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_revocation(pool, Arc::new(InMemoryRevocationStore::default()))
    }

    pub fn with_revocation(pool: PgPool, revocation: Arc<dyn RevocationStore>) -> Self {
        let analytics_service = AnalyticsService::new(pool.clone());
        let pipeline_service = PipelineService::new(pool.clone());
        let stage_history_service = StageHistoryService::new(pool.clone());
        let activity_service = ActivityService::new(pool.clone());
        let sla_service = SlaService::new(pool.clone());

        Self {
            pool,
            analytics_service,
            pipeline_service,
            stage_history_service,
            activity_service,
            sla_service,
            revocation,
        }
    }
}

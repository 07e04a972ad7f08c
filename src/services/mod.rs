pub mod activity_service;
pub mod analytics_service;
pub mod export_service;
pub mod pipeline_service;
pub mod rejection_service;
pub mod sla_service;
pub mod stage_history_service;

pub mod activity;
pub mod candidate;
pub mod interview;
pub mod job;
pub mod rules;
pub mod sla;
pub mod stage_history;
pub mod user;

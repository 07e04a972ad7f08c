pub mod analytics;
pub mod health;
pub mod pipeline;

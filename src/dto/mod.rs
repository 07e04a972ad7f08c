pub mod analytics_dto;
pub mod pipeline_dto;

pub mod history_service;
pub mod pipeline_service;

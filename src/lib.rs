//! # AI Stocks
//!
//! 日线历史行情 → 技术指标 → 逻辑回归 → 多/空仓回测。
//! Educational pipeline only, not investment advice.

pub mod app;
pub mod app_config;
pub mod error;
pub mod trading;

pub use error::app_error::{AppError, DataUnavailable};
pub use trading::services::pipeline_service::{run_pipeline, PipelineRequest, PipelineResult};

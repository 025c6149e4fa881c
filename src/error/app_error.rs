use thiserror::Error;

/// 行情数据不可用
///
/// Raised inside the history loader and caught at its boundary, so callers
/// only ever see it as the `Err` branch of a load result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataUnavailable {
    #[error("provider returned no rows")]
    EmptyResponse,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("could not find a Close/Adj Close column in: {columns:?}")]
    MissingCloseColumn { columns: Vec<String> },

    #[error("column {column} holds a non-numeric value: {value}")]
    Coercion { column: String, value: String },

    #[error("no complete rows left after dropping missing values")]
    NoCompleteRows,

    #[error("malformed bar table: {0}")]
    Malformed(String),

    #[error("bar index is not strictly increasing at {0}")]
    UnorderedIndex(chrono::NaiveDate),
}

/// 指标计算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("invalid indicator window {window}: {reason}")]
    InvalidWindow { window: usize, reason: String },
}

/// 模型训练/预测错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("{0} partition is empty")]
    EmptyPartition(&'static str),
}

/// 应用错误
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置错误
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Data(#[from] DataUnavailable),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, AppError>;

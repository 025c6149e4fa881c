use async_trait::async_trait;

use crate::error::DataUnavailable;
use crate::trading::model::{Period, RawBarTable};

pub mod chart;
pub mod yahoo_client;

pub use yahoo_client::YahooChartClient;

/// 行情数据源
///
/// One call, one fetch attempt. Implementations return the table as the
/// provider shaped it; column normalization happens in the history loader.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_daily(
        &self,
        ticker: &str,
        period: Period,
        auto_adjust: bool,
    ) -> Result<RawBarTable, DataUnavailable>;
}

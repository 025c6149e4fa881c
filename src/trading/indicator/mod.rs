pub mod basic_indicators;
pub mod pct_change;
pub mod sma;
pub mod volatility;

pub use basic_indicators::{add_basic_indicators, IndicatorRow, IndicatorTable, FEATURE_COLUMNS};

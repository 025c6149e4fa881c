pub mod period;
pub mod price_bar;
pub mod raw_table;

pub use period::Period;
pub use price_bar::{PriceBar, PriceBarSeries};
pub use raw_table::{Cell, ColumnIndex, RawBarTable};

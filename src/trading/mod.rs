pub mod backtest;
pub mod indicator;
pub mod ml;
pub mod model;
pub mod services;
pub mod yahoo;

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use ai_stocks::error::DataUnavailable;
use ai_stocks::trading::model::{Cell, ColumnIndex, Period, PriceBarSeries, RawBarTable};
use ai_stocks::trading::yahoo::MarketDataProvider;

/// Serves the same canned response on every call and counts the calls.
pub struct StaticFixtureProvider {
    response: Result<RawBarTable, DataUnavailable>,
    calls: AtomicUsize,
}

impl StaticFixtureProvider {
    pub fn new(table: RawBarTable) -> Self {
        Self {
            response: Ok(table),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: DataUnavailable) -> Self {
        Self {
            response: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for StaticFixtureProvider {
    async fn fetch_daily(
        &self,
        _ticker: &str,
        _period: Period,
        _auto_adjust: bool,
    ) -> Result<RawBarTable, DataUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

pub fn float_column(values: &[f64]) -> Vec<Cell> {
    values.iter().map(|&v| Cell::from(v)).collect()
}

/// Flat-labelled table with the given columns.
pub fn flat_table(columns: &[(&str, Vec<f64>)]) -> RawBarTable {
    let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    RawBarTable::new(
        dates(n),
        ColumnIndex::Flat(columns.iter().map(|(name, _)| name.to_string()).collect()),
        columns.iter().map(|(_, v)| float_column(v)).collect(),
    )
    .unwrap()
}

/// Deterministic zig-zag around an upward drift, so both labels occur.
pub fn synthetic_close(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let wiggle = match i % 4 {
                0 => 0.0,
                1 => 1.5,
                2 => -0.5,
                _ => 2.0,
            };
            100.0 + 0.3 * i as f64 + wiggle
        })
        .collect()
}

pub fn synthetic_volume(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1_000_000.0 + ((i * 37) % 11) as f64 * 10_000.0).collect()
}

/// Yahoo-shaped table: (field, ticker) columns, OHLC plus volume.
pub fn yahoo_like_table(n: usize) -> RawBarTable {
    let close = synthetic_close(n);
    let open: Vec<f64> = close.iter().map(|c| c - 0.4).collect();
    let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
    let columns = ["Close", "High", "Low", "Open", "Volume"]
        .iter()
        .map(|f| vec![f.to_string(), "TEST".to_string()])
        .collect();
    RawBarTable::new(
        dates(n),
        ColumnIndex::MultiLevel(columns),
        vec![
            float_column(&close),
            float_column(&high),
            float_column(&low),
            float_column(&open),
            float_column(&synthetic_volume(n)),
        ],
    )
    .unwrap()
}

pub fn series(close: &[f64]) -> PriceBarSeries {
    PriceBarSeries::new(dates(close.len()), close.to_vec(), vec![1_000.0; close.len()]).unwrap()
}

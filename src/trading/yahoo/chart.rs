use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataUnavailable;
use crate::trading::model::{Cell, ColumnIndex, RawBarTable};

// v8/finance/chart 响应结构
#[derive(Serialize, Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ChartError>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartData {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    /// exchange offset from UTC, seconds
    #[serde(default)]
    pub gmtoffset: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
    #[serde(default)]
    pub adjclose: Option<Vec<ChartAdjClose>>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartAdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResponse {
    /// First result of the envelope, or the provider's own error message.
    pub fn into_data(self) -> Result<Option<ChartData>, DataUnavailable> {
        if let Some(err) = self.chart.error {
            return Err(DataUnavailable::Provider(format!("{}: {}", err.code, err.description)));
        }
        Ok(self.chart.result.and_then(|r| r.into_iter().next()))
    }
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

impl ChartData {
    /// Build a two-level `(field, ticker)` table like a yfinance download.
    ///
    /// With `auto_adjust` the OHLC prices are scaled by `adjclose / close` and
    /// no `Adj Close` column is emitted; otherwise `Adj Close` is kept as its
    /// own column and prices stay raw.
    pub fn into_raw_table(self, ticker: &str, auto_adjust: bool) -> Result<RawBarTable, DataUnavailable> {
        let timestamps = match self.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => return Ok(RawBarTable::empty()),
        };
        let offset = self.meta.gmtoffset.unwrap_or(0);
        let index = timestamps
            .iter()
            .map(|&ts| {
                DateTime::from_timestamp(ts + offset, 0)
                    .map(|dt| dt.date_naive())
                    .ok_or_else(|| DataUnavailable::Malformed(format!("bad timestamp {}", ts)))
            })
            .collect::<Result<Vec<NaiveDate>, _>>()?;

        // a live intraday bar can share its date with the last daily bar;
        // keep only the last row of each date
        let rows: Vec<usize> = (0..index.len())
            .filter(|&i| index.get(i + 1) != Some(&index[i]))
            .collect();
        if rows.len() < index.len() {
            debug!("{}: collapsed {} rows sharing a date", ticker, index.len() - rows.len());
        }

        let n = index.len();
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = self
            .indicators
            .adjclose
            .and_then(|a| a.into_iter().next())
            .map(|a| a.adjclose);

        let column = |values: &[Option<f64>], ratio: Option<&Vec<Option<f64>>>| -> Vec<Cell> {
            rows.iter()
                .map(|&i| {
                    let v = value_at(values, i);
                    match ratio {
                        Some(r) => Cell::from(v.zip(r[i]).map(|(v, r)| v * r)),
                        None => Cell::from(v),
                    }
                })
                .collect()
        };

        let ratio: Option<Vec<Option<f64>>> = match (&adjclose, auto_adjust) {
            (Some(adj), true) => Some(
                (0..n)
                    .map(|i| match (value_at(adj, i), value_at(&quote.close, i)) {
                        (Some(a), Some(c)) if c != 0.0 => Some(a / c),
                        _ => None,
                    })
                    .collect(),
            ),
            (None, true) => {
                debug!("{}: no adjclose series, prices left unadjusted", ticker);
                None
            }
            _ => None,
        };

        let mut labels: Vec<&str> = Vec::new();
        let mut data: Vec<Vec<Cell>> = Vec::new();
        if !auto_adjust {
            if let Some(adj) = &adjclose {
                labels.push("Adj Close");
                data.push(column(adj, None));
            }
        }
        labels.push("Close");
        data.push(column(&quote.close, ratio.as_ref()));
        labels.push("High");
        data.push(column(&quote.high, ratio.as_ref()));
        labels.push("Low");
        data.push(column(&quote.low, ratio.as_ref()));
        labels.push("Open");
        data.push(column(&quote.open, ratio.as_ref()));
        labels.push("Volume");
        data.push(column(&quote.volume, None));

        let columns = ColumnIndex::MultiLevel(
            labels
                .into_iter()
                .map(|field| vec![field.to_string(), ticker.to_string()])
                .collect(),
        );
        let index = rows.iter().map(|&i| index[i]).collect();
        RawBarTable::new(index, columns, data)
    }
}

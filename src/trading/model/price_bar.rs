use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DataUnavailable;

/// One daily bar. Open/High/Low are only present when the provider sent them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: f64,
}

/// Cleaned daily bars, column-major.
///
/// Invariants: every column has one value per date, the date index is
/// strictly increasing, and no value is NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBarSeries {
    dates: Vec<NaiveDate>,
    close: Vec<f64>,
    volume: Vec<f64>,
    open: Option<Vec<f64>>,
    high: Option<Vec<f64>>,
    low: Option<Vec<f64>>,
}

impl PriceBarSeries {
    pub fn new(dates: Vec<NaiveDate>, close: Vec<f64>, volume: Vec<f64>) -> Result<Self, DataUnavailable> {
        let series = Self {
            dates,
            close,
            volume,
            open: None,
            high: None,
            low: None,
        };
        series.validate()?;
        Ok(series)
    }

    pub fn with_ohl(
        mut self,
        open: Option<Vec<f64>>,
        high: Option<Vec<f64>>,
        low: Option<Vec<f64>>,
    ) -> Result<Self, DataUnavailable> {
        self.open = open;
        self.high = high;
        self.low = low;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), DataUnavailable> {
        let n = self.dates.len();
        let columns = [
            ("Close", Some(&self.close)),
            ("Volume", Some(&self.volume)),
            ("Open", self.open.as_ref()),
            ("High", self.high.as_ref()),
            ("Low", self.low.as_ref()),
        ];
        for (name, values) in columns {
            let Some(values) = values else { continue };
            if values.len() != n {
                return Err(DataUnavailable::Malformed(format!(
                    "{} has {} values for {} dates",
                    name,
                    values.len(),
                    n
                )));
            }
            if values.iter().any(|v| v.is_nan()) {
                return Err(DataUnavailable::Malformed(format!("{} contains missing values", name)));
            }
        }
        if let Some(w) = self.dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(DataUnavailable::UnorderedIndex(w[1]));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    pub fn open(&self) -> Option<&[f64]> {
        self.open.as_deref()
    }

    pub fn high(&self) -> Option<&[f64]> {
        self.high.as_deref()
    }

    pub fn low(&self) -> Option<&[f64]> {
        self.low.as_deref()
    }

    pub fn bar(&self, i: usize) -> Option<PriceBar> {
        let date = *self.dates.get(i)?;
        Some(PriceBar {
            date,
            open: self.open.as_ref().map(|v| v[i]),
            high: self.high.as_ref().map(|v| v[i]),
            low: self.low.as_ref().map(|v| v[i]),
            close: self.close[i],
            volume: self.volume[i],
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = PriceBar> + '_ {
        (0..self.len()).filter_map(move |i| self.bar(i))
    }

    /// Rows `start..` as a new series; an out-of-range start yields an empty one.
    pub fn slice_from(&self, start: usize) -> Self {
        let start = start.min(self.len());
        let tail = |v: &Vec<f64>| v[start..].to_vec();
        Self {
            dates: self.dates[start..].to_vec(),
            close: tail(&self.close),
            volume: tail(&self.volume),
            open: self.open.as_ref().map(tail),
            high: self.high.as_ref().map(tail),
            low: self.low.as_ref().map(tail),
        }
    }
}

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::error::DataUnavailable;
use crate::trading::model::{Period, PriceBarSeries, RawBarTable};
use crate::trading::yahoo::MarketDataProvider;

/// Loader outcome: cleaned bars or an explicit "no data".
pub type DataResult = Result<PriceBarSeries, DataUnavailable>;

pub const CLOSE_CANDIDATES: [&str; 2] = ["Close", "Adj Close"];
pub const VOLUME_CANDIDATES: [&str; 1] = ["Volume"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnResolution {
    /// `position` indexes the table's columns
    Found { position: usize, name: String },
    NotFound,
}

impl ColumnResolution {
    pub fn found(&self) -> Option<&str> {
        match self {
            ColumnResolution::Found { name, .. } => Some(name),
            ColumnResolution::NotFound => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            ColumnResolution::Found { position, .. } => Some(*position),
            ColumnResolution::NotFound => None,
        }
    }
}

fn column_matches(column: &str, candidate: &str) -> bool {
    column.split('_').next() == Some(candidate) || column.starts_with(candidate)
}

/// Candidates are tried in priority order; within a candidate the first
/// column in table order wins.
pub fn resolve_column(columns: &[String], candidates: &[&str]) -> ColumnResolution {
    candidates
        .iter()
        .find_map(|cand| columns.iter().position(|c| column_matches(c, cand)))
        .map_or(ColumnResolution::NotFound, |position| ColumnResolution::Found {
            position,
            name: columns[position].clone(),
        })
}

/// Canonical columns after renaming and float coercion, before missing rows
/// are dropped. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    pub index: Vec<NaiveDate>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
}

fn coerce_column(raw: &RawBarTable, position: usize, name: &str) -> Result<Vec<Option<f64>>, DataUnavailable> {
    let cells = raw
        .column(position)
        .ok_or_else(|| DataUnavailable::Malformed(format!("column {} out of range", name)))?;
    cells
        .iter()
        .map(|cell| {
            cell.to_f64().map_err(|value| DataUnavailable::Coercion {
                column: name.to_string(),
                value,
            })
        })
        .collect()
}

/// Flatten the column labels, pick Close/Volume (and Open/High/Low when
/// present) and coerce them to floats.
pub fn normalize_columns(raw: &RawBarTable) -> Result<NormalizedFrame, DataUnavailable> {
    let columns = raw.columns().flatten();

    let close = match resolve_column(&columns, &CLOSE_CANDIDATES) {
        ColumnResolution::Found { position, name } => coerce_column(raw, position, &name)?,
        ColumnResolution::NotFound => {
            return Err(DataUnavailable::MissingCloseColumn { columns });
        }
    };

    let volume = match resolve_column(&columns, &VOLUME_CANDIDATES) {
        ColumnResolution::Found { position, name } => coerce_column(raw, position, &name)?,
        ColumnResolution::NotFound => {
            warn!("no Volume column in {:?}, filling with missing values", columns);
            vec![None; raw.index().len()]
        }
    };

    let optional = |base: &str| -> Result<Option<Vec<Option<f64>>>, DataUnavailable> {
        match resolve_column(&columns, &[base]) {
            ColumnResolution::Found { position, name } => coerce_column(raw, position, &name).map(Some),
            ColumnResolution::NotFound => Ok(None),
        }
    };

    Ok(NormalizedFrame {
        index: raw.index().to_vec(),
        close,
        volume,
        open: optional("Open")?,
        high: optional("High")?,
        low: optional("Low")?,
    })
}

impl NormalizedFrame {
    fn row_complete(&self, i: usize) -> bool {
        let optional_ok = |col: &Option<Vec<Option<f64>>>| col.as_ref().map_or(true, |c| c[i].is_some());
        self.close[i].is_some()
            && self.volume[i].is_some()
            && optional_ok(&self.open)
            && optional_ok(&self.high)
            && optional_ok(&self.low)
    }

    /// Drop every row with a missing value in any retained column.
    pub fn drop_incomplete(self) -> DataResult {
        let keep: Vec<usize> = (0..self.index.len()).filter(|&i| self.row_complete(i)).collect();
        let pick = |col: &[Option<f64>]| keep.iter().map(|&i| col[i].unwrap_or(f64::NAN)).collect::<Vec<f64>>();

        let dates = keep.iter().map(|&i| self.index[i]).collect();
        let series = PriceBarSeries::new(dates, pick(&self.close), pick(&self.volume))?;
        series.with_ohl(
            self.open.as_deref().map(pick),
            self.high.as_deref().map(pick),
            self.low.as_deref().map(pick),
        )
    }
}

fn clean(raw: &RawBarTable) -> DataResult {
    if raw.is_empty() {
        return Err(DataUnavailable::EmptyResponse);
    }
    normalize_columns(raw)?.drop_incomplete()
}

/// 加载日线历史
///
/// Fetches split/dividend-adjusted daily bars and cleans them. Any failure
/// along the way is logged and returned as `Err(DataUnavailable)`.
pub async fn load_history(provider: &dyn MarketDataProvider, ticker: &str, period: Period) -> DataResult {
    let result = match provider.fetch_daily(ticker, period, true).await {
        Ok(raw) => clean(&raw),
        Err(e) => Err(e),
    };
    match &result {
        Ok(series) => info!("loaded {} bars for {} ({})", series.len(), ticker, period),
        Err(e) => error!("Error loading history for {} ({}): {}", ticker, period, e),
    }
    result
}

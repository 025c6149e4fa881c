use chrono::NaiveDate;

use crate::error::DataUnavailable;

/// One cell as handed over by a data provider, before float coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Float(f64),
    Int(i64),
    Text(String),
    Missing,
}

impl Cell {
    /// Coerce to a float. `Ok(None)` means the value is missing (NaN counts as
    /// missing); `Err` carries the offending text.
    pub fn to_f64(&self) -> Result<Option<f64>, String> {
        match self {
            Cell::Float(v) if v.is_nan() => Ok(None),
            Cell::Float(v) => Ok(Some(*v)),
            Cell::Int(v) => Ok(Some(*v as f64)),
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_nan() => Ok(None),
                Ok(v) => Ok(Some(v)),
                Err(_) => Err(s.clone()),
            },
            Cell::Missing => Ok(None),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::Float).unwrap_or(Cell::Missing)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

/// Column labels of a raw table: either plain names or multi-level tuples
/// such as `("Close", "AAPL")`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnIndex {
    Flat(Vec<String>),
    MultiLevel(Vec<Vec<String>>),
}

/// Parts that carry no information when joining a multi-level label.
const EMPTY_LABEL_PARTS: [&str; 3] = ["", "None", "nan"];

impl ColumnIndex {
    pub fn len(&self) -> usize {
        match self {
            ColumnIndex::Flat(names) => names.len(),
            ColumnIndex::MultiLevel(tuples) => tuples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Single string name per column; tuple parts are joined with `_`.
    pub fn flatten(&self) -> Vec<String> {
        match self {
            ColumnIndex::Flat(names) => names.clone(),
            ColumnIndex::MultiLevel(tuples) => tuples
                .iter()
                .map(|parts| {
                    parts
                        .iter()
                        .map(|p| p.as_str())
                        .filter(|p| !EMPTY_LABEL_PARTS.contains(p))
                        .collect::<Vec<_>>()
                        .join("_")
                })
                .collect(),
        }
    }
}

/// Bars exactly as fetched: date index, column labels and column-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBarTable {
    index: Vec<NaiveDate>,
    columns: ColumnIndex,
    data: Vec<Vec<Cell>>,
}

impl RawBarTable {
    pub fn new(
        index: Vec<NaiveDate>,
        columns: ColumnIndex,
        data: Vec<Vec<Cell>>,
    ) -> Result<Self, DataUnavailable> {
        if columns.len() != data.len() {
            return Err(DataUnavailable::Malformed(format!(
                "{} column labels for {} columns",
                columns.len(),
                data.len()
            )));
        }
        if let Some(bad) = data.iter().position(|col| col.len() != index.len()) {
            return Err(DataUnavailable::Malformed(format!(
                "column {} has {} rows, index has {}",
                bad,
                data[bad].len(),
                index.len()
            )));
        }
        Ok(Self { index, columns, data })
    }

    pub fn empty() -> Self {
        Self {
            index: Vec::new(),
            columns: ColumnIndex::Flat(Vec::new()),
            data: Vec::new(),
        }
    }

    /// Empty when either axis has length zero.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    pub fn column(&self, position: usize) -> Option<&[Cell]> {
        self.data.get(position).map(|c| c.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_multi_level_skips_empty_parts() {
        let columns = ColumnIndex::MultiLevel(vec![
            vec!["Close".into(), "AAPL".into()],
            vec!["Volume".into(), "".into()],
            vec!["Adj Close".into(), "nan".into()],
            vec!["None".into(), "Open".into()],
        ]);
        assert_eq!(columns.flatten(), vec!["Close_AAPL", "Volume", "Adj Close", "Open"]);
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(Cell::Float(1.5).to_f64(), Ok(Some(1.5)));
        assert_eq!(Cell::Float(f64::NAN).to_f64(), Ok(None));
        assert_eq!(Cell::Int(3).to_f64(), Ok(Some(3.0)));
        assert_eq!(Cell::from(" 2.25 ").to_f64(), Ok(Some(2.25)));
        assert_eq!(Cell::Missing.to_f64(), Ok(None));
        assert_eq!(Cell::from("abc").to_f64(), Err("abc".to_string()));
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let res = RawBarTable::new(
            vec![day],
            ColumnIndex::Flat(vec!["Close".into()]),
            vec![vec![Cell::Float(1.0), Cell::Float(2.0)]],
        );
        assert!(matches!(res, Err(DataUnavailable::Malformed(_))));
    }
}

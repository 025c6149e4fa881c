use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 历史区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported period {0:?}, expected one of 1y, 2y, 5y, 10y")]
pub struct ParsePeriodError(pub String);

impl Period {
    pub const ALL: [Period; 4] = [
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
    ];

    /// Token understood by the chart API `range` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::OneYear
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

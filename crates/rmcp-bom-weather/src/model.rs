//! Normalized records returned by the parser.
//!
//! Fields that could not be determined hold sentinels: `f64::NAN` for numbers
//! and [`UNKNOWN`] for conditions. Serialized through `serde_json`, NaN is
//! written as `null`.

use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// Identifies the bureau in every warnings report.
pub const SOURCE: &str = "BoM";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temp_c: f64,
    pub condition: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub min_c: f64,
    pub max_c: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub days: Vec<ForecastDay>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningItem {
    pub title: String,
}

/// `count` equals `items.len()`, except when only a raw tally of the word
/// "warning" could be made; then `items` is empty and `count` is the tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningsReport {
    pub source: String,
    pub count: usize,
    pub items: Vec<WarningItem>,
}

impl WarningsReport {
    pub fn from_titles(titles: Vec<String>) -> Self {
        Self {
            source: SOURCE.to_string(),
            count: titles.len(),
            items: titles.into_iter().map(|title| WarningItem { title }).collect(),
        }
    }

    pub fn none() -> Self {
        Self::from_titles(Vec::new())
    }

    pub fn tally_only(count: usize) -> Self {
        Self {
            source: SOURCE.to_string(),
            count,
            items: Vec::new(),
        }
    }
}

pub(crate) fn temp_or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

pub(crate) fn condition_or_unknown(value: Option<String>) -> String {
    value
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

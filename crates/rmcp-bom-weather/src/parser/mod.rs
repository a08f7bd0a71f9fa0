//! Bulletin parsing.
//!
//! Each parser reads a bulletin as XML when it can and falls back to text
//! patterns when the markup is malformed or missing the expected structure.
//! Malformed input is never an error: it lowers the quality of the record
//! (more NaN and "Unknown" fields) instead. The only failure is a
//! non-success status, which is rejected before any extraction.

mod current;
mod forecast;
mod heuristics;
mod markup;
mod strategy;
mod warnings;

use chrono::{NaiveDate, SecondsFormat, Utc};
use roxmltree::{Document, Node};

use crate::cities::City;
use crate::error::WeatherError;
use crate::model::{
    condition_or_unknown, temp_or_nan, CurrentWeather, Forecast, ForecastDay, WarningsReport,
};

pub const STATUS_OK: u16 = 200;

pub const DEFAULT_FORECAST_DAYS: usize = 7;

/// A bulletin's raw text together with its XML tree, when it has one.
pub(crate) struct Bulletin<'input> {
    pub raw: &'input str,
    pub doc: Option<Document<'input>>,
    city: Option<City>,
}

impl<'input> Bulletin<'input> {
    pub(crate) fn new(city: City, raw: &'input str) -> Self {
        Self {
            raw,
            doc: markup::parse(raw),
            city: Some(city),
        }
    }

    pub(crate) fn untargeted(raw: &'input str) -> Self {
        Self {
            raw,
            doc: markup::parse(raw),
            city: None,
        }
    }

    /// The forecast area describing this bulletin's city.
    pub(crate) fn area(&self) -> Option<Node<'_, 'input>> {
        let doc = self.doc.as_ref()?;
        markup::find_area(doc, self.city?)
    }
}

/// One forecast day before sentinels are applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DayReading {
    pub date: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub condition: Option<String>,
}

impl DayReading {
    fn into_day(self, today: NaiveDate, position: usize) -> ForecastDay {
        ForecastDay {
            date: self
                .date
                .unwrap_or_else(|| forecast::position_date(today, position)),
            min_c: temp_or_nan(self.min),
            max_c: temp_or_nan(self.max),
            condition: condition_or_unknown(self.condition),
        }
    }
}

/// Current UTC time, second precision, `Z` suffix.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn ensure_success(status: u16, subject: &str) -> Result<(), WeatherError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(WeatherError::Transport {
            status,
            subject: subject.to_string(),
        })
    }
}

/// Current conditions for `city`.
///
/// `updated_at` is always the time of parsing: bulletins state their issue
/// time in local, free-form text that is not parsed.
pub fn parse_current(city: City, status: u16, raw: &str) -> Result<CurrentWeather, WeatherError> {
    ensure_success(status, city.as_str())?;
    let bulletin = Bulletin::new(city, raw);

    let temperature = current::temperature(&bulletin);
    let condition = current::condition(&bulletin);
    if let Some(issued) = heuristics::issued_phrase(raw) {
        tracing::debug!(%city, %issued, "bulletin states an issue time, using wall clock");
    }
    if temperature.is_none() {
        tracing::debug!(%city, "no temperature in bulletin");
    }

    Ok(CurrentWeather {
        city: city.to_string(),
        temp_c: temp_or_nan(temperature),
        condition: condition_or_unknown(condition),
        updated_at: iso_now(),
    })
}

/// A `days`-long forecast for `city`; `days` below 1 is treated as 1.
pub fn parse_forecast(
    city: City,
    status: u16,
    raw: &str,
    days: usize,
) -> Result<Forecast, WeatherError> {
    ensure_success(status, city.as_str())?;
    let bulletin = Bulletin::new(city, raw);
    let today = Utc::now().date_naive();
    let input = forecast::ForecastInput {
        bulletin: &bulletin,
        days: days.max(1),
        today,
    };

    let days = forecast::readings(&input)
        .into_iter()
        .enumerate()
        .map(|(position, reading)| reading.into_day(today, position))
        .collect();

    Ok(Forecast {
        city: city.to_string(),
        days,
        generated_at: iso_now(),
    })
}

pub fn parse_warnings(status: u16, raw: &str) -> Result<WarningsReport, WeatherError> {
    ensure_success(status, "warnings")?;
    Ok(warnings::report(&Bulletin::untargeted(raw)))
}

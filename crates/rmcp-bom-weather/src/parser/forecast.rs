use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use roxmltree::Node;

use super::strategy::{first_success, Strategy};
use super::{heuristics, markup, Bulletin, DayReading};

pub(crate) const BASELINE_MIN_C: f64 = 12.0;
pub(crate) const BASELINE_MAX_C: f64 = 24.0;
const MIN_DRIFT_PER_DAY: f64 = 0.2;
const MAX_DRIFT_PER_DAY: f64 = 0.3;

static LEADING_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})").unwrap_or_else(|e| panic!("invalid date pattern: {e}"))
});

pub(crate) struct ForecastInput<'a, 'input> {
    pub bulletin: &'a Bulletin<'input>,
    pub days: usize,
    pub today: NaiveDate,
}

/// `today + offset`, or `None` past the end of the calendar.
pub(crate) fn offset_date(today: NaiveDate, offset: usize) -> Option<String> {
    let offset = u64::try_from(offset).ok()?;
    today
        .checked_add_days(Days::new(offset))
        .map(|date| date.to_string())
}

/// Date of the day at `position`, falling back to today.
pub(crate) fn position_date(today: NaiveDate, position: usize) -> String {
    offset_date(today, position).unwrap_or_else(|| today.to_string())
}

/// Forecast periods of the city's area, in document order.
struct StructuredPeriods;

impl Strategy<ForecastInput<'_, '_>, Vec<DayReading>> for StructuredPeriods {
    fn name(&self) -> &'static str {
        "structured-periods"
    }

    fn try_extract(&self, input: &ForecastInput<'_, '_>) -> Option<Vec<DayReading>> {
        let area = input.bulletin.area()?;
        let mut readings = Vec::new();
        for period in markup::periods(area).take(input.days) {
            let date = period_date(period, input.today, readings.len());
            readings.push(DayReading {
                date: Some(date),
                min: markup::element_value(period, "air_temperature_minimum"),
                max: markup::element_value(period, "air_temperature_maximum"),
                condition: markup::precis(period),
            });
        }
        non_empty(readings)
    }
}

/// `start-time-local` date, else the `index` offset from today, else the
/// position among periods read so far.
fn period_date(period: Node<'_, '_>, today: NaiveDate, position: usize) -> String {
    if let Some(date) = period
        .attribute("start-time-local")
        .and_then(|start| LEADING_DATE.captures(start))
        .and_then(|caps| caps.get(1))
    {
        return date.as_str().to_string();
    }
    period
        .attribute("index")
        .and_then(|index| index.trim().parse::<usize>().ok())
        .and_then(|index| offset_date(today, index))
        .unwrap_or_else(|| position_date(today, position))
}

struct PairedMinMax;

impl Strategy<ForecastInput<'_, '_>, Vec<DayReading>> for PairedMinMax {
    fn name(&self) -> &'static str {
        "paired-min-max"
    }

    fn try_extract(&self, input: &ForecastInput<'_, '_>) -> Option<Vec<DayReading>> {
        non_empty(heuristics::min_max_pairs(input.bulletin.raw))
    }
}

struct LabelledColumns;

impl Strategy<ForecastInput<'_, '_>, Vec<DayReading>> for LabelledColumns {
    fn name(&self) -> &'static str {
        "labelled-columns"
    }

    fn try_extract(&self, input: &ForecastInput<'_, '_>) -> Option<Vec<DayReading>> {
        non_empty(heuristics::min_max_columns(input.bulletin.raw))
    }
}

fn non_empty(readings: Vec<DayReading>) -> Option<Vec<DayReading>> {
    (!readings.is_empty()).then_some(readings)
}

/// Exactly `input.days` readings: structured periods padded from the last
/// period, else text matches padded by position, else a drifting baseline.
pub(crate) fn readings(input: &ForecastInput<'_, '_>) -> Vec<DayReading> {
    if let Some(mut readings) = StructuredPeriods.try_extract(input) {
        tracing::debug!(strategy = StructuredPeriods.name(), "extraction succeeded");
        readings.truncate(input.days);
        pad_from_last(&mut readings, input.days);
        return readings;
    }

    let text: [&dyn Strategy<ForecastInput<'_, '_>, Vec<DayReading>>; 2] =
        [&PairedMinMax, &LabelledColumns];
    let mut readings = first_success(input, &text).unwrap_or_else(|| {
        tracing::debug!("no forecast readings found, synthesizing from baseline");
        Vec::new()
    });
    readings.truncate(input.days);
    pad_by_position(&mut readings, input.days);
    readings
}

/// The k-th padded day after the last reading drifts by k steps. Padded
/// days keep the last reading's condition and get positional dates.
pub(crate) fn pad_from_last(readings: &mut Vec<DayReading>, days: usize) {
    let Some(last) = readings.last().cloned() else {
        pad_by_position(readings, days);
        return;
    };
    let last_position = readings.len() - 1;
    for position in readings.len()..days {
        let steps = (position - last_position) as f64;
        readings.push(DayReading {
            date: None,
            min: Some(last.min.unwrap_or(BASELINE_MIN_C) + MIN_DRIFT_PER_DAY * steps),
            max: Some(last.max.unwrap_or(BASELINE_MAX_C) + MAX_DRIFT_PER_DAY * steps),
            condition: last.condition.clone(),
        });
    }
}

/// Padded day `i` is the last reading (or the baseline) plus `i` steps,
/// with no condition.
pub(crate) fn pad_by_position(readings: &mut Vec<DayReading>, days: usize) {
    let (base_min, base_max) = readings.last().map_or((BASELINE_MIN_C, BASELINE_MAX_C), |last| {
        (
            last.min.unwrap_or(BASELINE_MIN_C),
            last.max.unwrap_or(BASELINE_MAX_C),
        )
    });
    for position in readings.len()..days {
        let steps = position as f64;
        readings.push(DayReading {
            date: None,
            min: Some(base_min + MIN_DRIFT_PER_DAY * steps),
            max: Some(base_max + MAX_DRIFT_PER_DAY * steps),
            condition: None,
        });
    }
}

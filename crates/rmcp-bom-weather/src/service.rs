//! The four weather operations, composed from a bulletin source and the parsers.

use std::sync::Arc;

use futures::future::join_all;

use crate::cities::City;
use crate::client::BulletinSource;
use crate::error::WeatherError;
use crate::model::{CurrentWeather, Forecast, WarningsReport};
use crate::parser::{self, DEFAULT_FORECAST_DAYS};

/// Upper bound on forecast length accepted from tool callers.
pub const MAX_FORECAST_DAYS: usize = 31;

#[derive(Debug, Clone)]
pub struct WeatherService {
    source: Arc<dyn BulletinSource>,
}

/// Requested day count as a forecast length: absent means the default,
/// anything below 1 means 1.
pub fn forecast_length(days: Option<i64>) -> usize {
    match days {
        None => DEFAULT_FORECAST_DAYS,
        Some(d) if d < 1 => 1,
        Some(d) => usize::try_from(d).map_or(MAX_FORECAST_DAYS, |d| d.min(MAX_FORECAST_DAYS)),
    }
}

impl WeatherService {
    pub fn new(source: Arc<dyn BulletinSource>) -> Self {
        Self { source }
    }

    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let city: City = city.parse()?;
        self.current_for(city).await
    }

    async fn current_for(&self, city: City) -> Result<CurrentWeather, WeatherError> {
        let bulletin = self.source.fetch_city_bulletin(city).await?;
        parser::parse_current(city, bulletin.status, &bulletin.text)
    }

    pub async fn forecast(&self, city: &str, days: Option<i64>) -> Result<Forecast, WeatherError> {
        let city: City = city.parse()?;
        let bulletin = self.source.fetch_city_bulletin(city).await?;
        parser::parse_forecast(city, bulletin.status, &bulletin.text, forecast_length(days))
    }

    /// Current conditions for every city, in registry order. Cities are
    /// fetched concurrently; a failure is reported only after all finish.
    pub async fn current_weather_all_major_cities(
        &self,
    ) -> Result<Vec<CurrentWeather>, WeatherError> {
        let results = join_all(City::ALL.into_iter().map(|city| self.current_for(city))).await;

        let mut out = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (city, result) in City::ALL.into_iter().zip(results) {
            match result {
                Ok(current) => out.push(current),
                Err(e) => {
                    tracing::warn!(%city, error = %e, "city bulletin failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(out),
        }
    }

    pub async fn current_warnings(&self) -> Result<WarningsReport, WeatherError> {
        let bulletin = self.source.fetch_warnings_bulletin().await?;
        parser::parse_warnings(bulletin.status, &bulletin.text)
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmcp_bom_weather::client::NO_WARNINGS_BULLETIN;
use rmcp_bom_weather::{BulletinSource, City, FetchError, RawBulletin, WeatherService};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

pub fn city_fixture(city: City) -> String {
    fixture(&format!("{}.xml", city.product_id()))
}

/// Serves bulletins from `tests/fixtures`, counting every fetch.
#[derive(Debug)]
pub struct FixtureSource {
    status: u16,
    warnings: String,
    overrides: HashMap<City, String>,
    delays: HashMap<City, Duration>,
    fetches: AtomicUsize,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self {
            status: 200,
            warnings: NO_WARNINGS_BULLETIN.to_string(),
            overrides: HashMap::new(),
            delays: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl FixtureSource {
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_warnings(mut self, text: impl Into<String>) -> Self {
        self.warnings = text.into();
        self
    }

    pub fn with_bulletin(mut self, city: City, text: impl Into<String>) -> Self {
        self.overrides.insert(city, text.into());
        self
    }

    pub fn with_delay(mut self, city: City, delay: Duration) -> Self {
        self.delays.insert(city, delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BulletinSource for FixtureSource {
    async fn fetch_city_bulletin(&self, city: City) -> Result<RawBulletin, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&city) {
            tokio::time::sleep(*delay).await;
        }
        let text = self
            .overrides
            .get(&city)
            .cloned()
            .unwrap_or_else(|| city_fixture(city));
        Ok(RawBulletin {
            status: self.status,
            text,
        })
    }

    async fn fetch_warnings_bulletin(&self) -> Result<RawBulletin, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(RawBulletin {
            status: self.status,
            text: self.warnings.clone(),
        })
    }
}

pub fn fixture_service(source: FixtureSource) -> (WeatherService, Arc<FixtureSource>) {
    let source = Arc::new(source);
    (WeatherService::new(source.clone()), source)
}

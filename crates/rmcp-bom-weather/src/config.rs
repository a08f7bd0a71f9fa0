use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cities::City;

/// Environment variable naming a TOML config file for the stdio binary.
pub const CONFIG_PATH_ENV: &str = "BOM_WEATHER_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Ftp,
    Http,
}

impl std::str::FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ftp" => Ok(Transport::Ftp),
            "http" | "https" => Ok(Transport::Http),
            other => Err(anyhow!("Unknown transport '{other}'. Supported transports: ftp, http.")),
        }
    }
}

/// Where bulletins come from and how hard to try.
///
/// Example TOML:
/// ```toml
/// transport = "ftp"
/// ftp_host = "ftp.bom.gov.au"
/// directory = "/anon/gen/fwo"
///
/// [products]
/// Sydney = "IDN60920"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transport: Transport,
    pub ftp_host: String,
    pub ftp_port: u16,
    pub http_base_url: String,
    pub directory: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Per-city product overrides, keyed by city name.
    pub products: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: Transport::Ftp,
            ftp_host: "ftp.bom.gov.au".to_string(),
            ftp_port: 21,
            http_base_url: "http://www.bom.gov.au".to_string(),
            directory: "/anon/gen/fwo".to_string(),
            timeout_secs: 15,
            max_retries: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 5_000,
            products: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Defaults, then the file at `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], with the file path taken from `BOM_WEATHER_CONFIG`.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(std::path::PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BOM_TRANSPORT") {
            self.transport = v.parse()?;
        }
        if let Some(v) = lookup("BOM_FTP_HOST") {
            self.ftp_host = v;
        }
        if let Some(v) = lookup("BOM_FTP_PORT") {
            self.ftp_port = v.parse().with_context(|| format!("Invalid BOM_FTP_PORT '{v}'"))?;
        }
        if let Some(v) = lookup("BOM_DIRECTORY") {
            self.directory = v;
        }
        if let Some(v) = lookup("BOM_HTTP_BASE_URL") {
            self.http_base_url = v;
        }
        if let Some(v) = lookup("BOM_TIMEOUT_SECS") {
            self.timeout_secs = v
                .parse()
                .with_context(|| format!("Invalid BOM_TIMEOUT_SECS '{v}'"))?;
        }
        if let Some(v) = lookup("BOM_MAX_RETRIES") {
            self.max_retries = v
                .parse()
                .with_context(|| format!("Invalid BOM_MAX_RETRIES '{v}'"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(anyhow!("max_retries must be at least 1"));
        }
        if let Some(name) = self.products.keys().find(|name| name.parse::<City>().is_err()) {
            return Err(anyhow!(
                "Product override for unsupported city '{name}'. Supported: {}",
                City::names().join(", ")
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured product for `city`, else the registry default.
    pub fn product_for(&self, city: City) -> String {
        self.products
            .get(city.as_str())
            .cloned()
            .unwrap_or_else(|| city.product_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_bureau_service() {
        let cfg = Config::default();
        assert_eq!(cfg.transport, Transport::Ftp);
        assert_eq!(cfg.ftp_host, "ftp.bom.gov.au");
        assert_eq!(cfg.directory, "/anon/gen/fwo");
        assert_eq!(cfg.timeout(), Duration::from_secs(15));
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.product_for(City::Brisbane), "IDQ60920");
    }

    #[test]
    fn loads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "transport = \"http\"\nmax_retries = 5\n\n[products]\nPerth = \"IDW12300\""
        )
        .unwrap();

        let cfg = Config::from_file(file.path()).unwrap();
        assert_eq!(cfg.transport, Transport::Http);
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.ftp_host, "ftp.bom.gov.au");
        assert_eq!(cfg.product_for(City::Perth), "IDW12300");
        assert_eq!(cfg.product_for(City::Darwin), "IDD60920");
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BOM_TRANSPORT", "HTTP"),
            ("BOM_FTP_HOST", "mirror.example"),
            ("BOM_TIMEOUT_SECS", "2"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.transport, Transport::Http);
        assert_eq!(cfg.ftp_host, "mirror.example");
        assert_eq!(cfg.timeout_secs, 2);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env(|k| (k == "BOM_FTP_PORT").then(|| "twenty-one".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("BOM_FTP_PORT"));
    }

    #[test]
    fn rejects_unknown_product_city() {
        let mut cfg = Config::default();
        cfg.products.insert("Atlantis".into(), "IDX00000".into());
        assert!(cfg.validate().unwrap_err().to_string().contains("Atlantis"));
    }

    #[test]
    fn rejects_zero_retries() {
        let cfg = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}

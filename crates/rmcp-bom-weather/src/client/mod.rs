//! Bulletin retrieval.

mod remote;
mod retry;

pub use remote::{FtpFiles, HttpFiles, RemoteFiles};
pub use retry::RetryPolicy;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cities::City;
use crate::config::{Config, Transport};
use crate::error::FetchError;
use crate::parser::STATUS_OK;

/// Served when the directory holds no warnings product.
pub const NO_WARNINGS_BULLETIN: &str = "<warnings><none>No warnings</none></warnings>";

/// A bulletin as retrieved, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBulletin {
    pub status: u16,
    pub text: String,
}

#[async_trait]
pub trait BulletinSource: Send + Sync + Debug {
    async fn fetch_city_bulletin(&self, city: City) -> Result<RawBulletin, FetchError>;

    async fn fetch_warnings_bulletin(&self) -> Result<RawBulletin, FetchError>;
}

/// Path of a product under `directory`. Products ending in `.xml` are taken
/// as file names, and absolute ones as full paths.
pub fn product_path(directory: &str, product: &str) -> String {
    let directory = directory.trim_end_matches('/');
    if product.ends_with(".xml") {
        if product.starts_with('/') {
            product.to_string()
        } else {
            format!("{directory}/{product}")
        }
    } else {
        format!("{directory}/{product}.xml")
    }
}

/// Newest-named XML warnings product in a directory listing.
pub fn select_warnings_file(names: &[String]) -> Option<&str> {
    names
        .iter()
        .map(String::as_str)
        .filter(|name| name.ends_with(".xml") && name.to_lowercase().contains("warn"))
        .max()
}

#[derive(Debug, Clone)]
pub struct BomClient {
    files: Arc<dyn RemoteFiles>,
    config: Config,
    retry: RetryPolicy,
}

impl BomClient {
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let files: Arc<dyn RemoteFiles> = match config.transport {
            Transport::Ftp => Arc::new(FtpFiles::new(
                config.ftp_host.clone(),
                config.ftp_port,
                config.timeout(),
            )),
            Transport::Http => Arc::new(HttpFiles::new(
                config.http_base_url.clone(),
                config.timeout(),
            )?),
        };
        Ok(Self::with_files(files, config))
    }

    pub fn with_files(files: Arc<dyn RemoteFiles>, config: &Config) -> Self {
        Self {
            files,
            config: config.clone(),
            retry: RetryPolicy::from_config(config),
        }
    }

    pub fn city_path(&self, city: City) -> String {
        product_path(&self.config.directory, &self.config.product_for(city))
    }
}

#[async_trait]
impl BulletinSource for BomClient {
    async fn fetch_city_bulletin(&self, city: City) -> Result<RawBulletin, FetchError> {
        let path = self.city_path(city);
        tracing::debug!(%city, %path, "fetching city bulletin");
        self.retry
            .run(&format!("RETR {path}"), || self.files.fetch(&path))
            .await
    }

    async fn fetch_warnings_bulletin(&self) -> Result<RawBulletin, FetchError> {
        let directory = &self.config.directory;
        let names = self
            .retry
            .run(&format!("LIST {directory}"), || self.files.list(directory))
            .await?;

        let Some(name) = select_warnings_file(&names) else {
            tracing::info!(%directory, "no warnings product listed");
            return Ok(RawBulletin {
                status: STATUS_OK,
                text: NO_WARNINGS_BULLETIN.to_string(),
            });
        };
        let path = product_path(directory, name);
        tracing::debug!(%path, "fetching warnings bulletin");
        self.retry
            .run(&format!("RETR {path}"), || self.files.fetch(&path))
            .await
    }
}

//! File transports for the bureau's anonymous distribution service.

use std::fmt::Debug;
use std::net::ToSocketAddrs;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use suppaftp::types::FileType;
use suppaftp::FtpStream;

use super::RawBulletin;
use crate::error::FetchError;
use crate::parser::STATUS_OK;

const USER_AGENT: &str = concat!("rmcp-bom-weather/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait RemoteFiles: Send + Sync + Debug {
    /// File names (not paths) in `directory`.
    async fn list(&self, directory: &str) -> Result<Vec<String>, FetchError>;

    async fn fetch(&self, path: &str) -> Result<RawBulletin, FetchError>;
}

fn base_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

/// Anonymous FTP. Each operation opens its own connection.
#[derive(Debug, Clone)]
pub struct FtpFiles {
    host: String,
    port: u16,
    timeout: Duration,
}

impl FtpFiles {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    fn connect(&self) -> Result<FtpStream, FetchError> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| FetchError::Resolve(self.host.clone()))?;
        let mut ftp = FtpStream::connect_timeout(addr, self.timeout)?;
        ftp.get_ref().set_read_timeout(Some(self.timeout))?;
        ftp.get_ref().set_write_timeout(Some(self.timeout))?;
        ftp.login("anonymous", "anonymous@")?;
        ftp.transfer_type(FileType::Binary)?;
        Ok(ftp)
    }

    fn list_blocking(&self, directory: &str) -> Result<Vec<String>, FetchError> {
        let mut ftp = self.connect()?;
        ftp.cwd(directory)?;
        let names = ftp.nlst(None)?;
        if let Err(e) = ftp.quit() {
            tracing::debug!(error = %e, "FTP quit failed");
        }
        Ok(names.iter().map(|n| base_name(n).to_string()).collect())
    }

    fn fetch_blocking(&self, path: &str) -> Result<RawBulletin, FetchError> {
        let mut ftp = self.connect()?;
        let bytes = ftp.retr_as_buffer(path)?.into_inner();
        if let Err(e) = ftp.quit() {
            tracing::debug!(error = %e, "FTP quit failed");
        }
        Ok(RawBulletin {
            status: STATUS_OK,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

#[async_trait]
impl RemoteFiles for FtpFiles {
    async fn list(&self, directory: &str) -> Result<Vec<String>, FetchError> {
        let this = self.clone();
        let directory = directory.to_string();
        tokio::task::spawn_blocking(move || this.list_blocking(&directory)).await?
    }

    async fn fetch(&self, path: &str) -> Result<RawBulletin, FetchError> {
        let this = self.clone();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || this.fetch_blocking(&path)).await?
    }
}

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=["']([^"'?#]+)"#)
        .unwrap_or_else(|e| panic!("invalid href pattern: {e}"))
});

/// Links of an HTML directory index, reduced to file names.
pub(crate) fn index_entries(html: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in HREF.captures_iter(html) {
        let Some(href) = caps.get(1) else { continue };
        let name = base_name(href.as_str());
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// HTTP mirror of the distribution directories. Server errors are returned
/// as [`FetchError::ServerStatus`] so they are retried; other statuses are
/// passed through and non-success bulletins are rejected by the parser.
#[derive(Debug, Clone)]
pub struct HttpFiles {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFiles {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded.join("/"))
    }
}

#[async_trait]
impl RemoteFiles for HttpFiles {
    async fn list(&self, directory: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/", self.url(directory));
        let response = self.client.get(&url).send().await?;
        let response = response.error_for_status()?;
        Ok(index_entries(&response.text().await?))
    }

    async fn fetch(&self, path: &str) -> Result<RawBulletin, FetchError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        if response.status().is_server_error() {
            return Err(FetchError::ServerStatus(status));
        }
        let text = response.text().await?;
        Ok(RawBulletin { status, text })
    }
}

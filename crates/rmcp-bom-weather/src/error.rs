use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::cities::City;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Unsupported city '{city}'. Supported: {}", City::names().join(", "))]
    UnsupportedCity { city: String },

    /// A bulletin arrived with a non-success status. Never retried by the parser.
    #[error("BoM returned status {status} for {subject}")]
    Transport { status: u16, subject: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl WeatherError {
    pub fn supported_cities(&self) -> Option<Vec<&'static str>> {
        match self {
            WeatherError::UnsupportedCity { .. } => Some(City::names()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not resolve host '{0}'")]
    Resolve(String),

    /// The mirror answered with a 5xx status; retried like a transport failure.
    #[error("server returned status {0}")]
    ServerStatus(u16),

    #[error("transfer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{operation} failed after {attempts} attempt(s): {last}")]
    Exhausted {
        operation: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl From<WeatherError> for McpError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::UnsupportedCity { .. } => McpError::invalid_params(
                err.to_string(),
                Some(serde_json::json!({ "supported": City::names() })),
            ),
            other => McpError::internal_error(other.to_string(), None),
        }
    }
}

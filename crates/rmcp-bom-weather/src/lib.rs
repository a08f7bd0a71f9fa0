//! rmcp-bom-weather: MCP server for Bureau of Meteorology weather bulletins
//!
//! Bulletins are pulled from the bureau's anonymous file service, normalized
//! by [`parser`] and exposed as four tools by [`BomWeatherServer`].

pub mod cities;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod service;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, ServerHandler, wrapper::Parameters},
    model::*,
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use cities::City;
pub use client::{BomClient, BulletinSource, RawBulletin};
pub use config::{Config, Transport};
pub use error::{FetchError, WeatherError};
pub use model::{CurrentWeather, Forecast, ForecastDay, WarningItem, WarningsReport};
pub use service::WeatherService;

#[derive(Debug)]
pub struct BomWeatherServer {
    pub tool_router: ToolRouter<Self>,
    service: WeatherService,
}

impl BomWeatherServer {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = BomClient::from_config(config)?;
        Ok(Self::with_source(Arc::new(client)))
    }

    pub fn with_source(source: Arc<dyn BulletinSource>) -> Self {
        Self::with_service(WeatherService::new(source))
    }

    pub fn with_service(service: WeatherService) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service,
        }
    }

    pub fn service(&self) -> &WeatherService {
        &self.service
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// Tool parameter structs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CityParams {
    #[schemars(
        description = "City name: Sydney, Melbourne, Adelaide, Brisbane, Darwin, Perth or Hobart"
    )]
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ForecastParams {
    #[schemars(
        description = "City name: Sydney, Melbourne, Adelaide, Brisbane, Darwin, Perth or Hobart"
    )]
    pub city: String,
    #[schemars(description = "Number of days (default 7, at least 1, at most 31)")]
    #[serde(default)]
    pub days: Option<i64>,
}

#[rmcp::tool_router]
impl BomWeatherServer {
    #[rmcp::tool(description = "Get current weather conditions for a major Australian city")]
    pub async fn current_weather(
        &self,
        Parameters(params): Parameters<CityParams>,
    ) -> Result<CallToolResult, McpError> {
        let current = self.service.current_weather(&params.city).await?;
        json_result(&current)
    }

    #[rmcp::tool(description = "Get the multi-day forecast for a major Australian city")]
    pub async fn forecast(
        &self,
        Parameters(params): Parameters<ForecastParams>,
    ) -> Result<CallToolResult, McpError> {
        let forecast = self.service.forecast(&params.city, params.days).await?;
        json_result(&forecast)
    }

    #[rmcp::tool(description = "Get current weather conditions for all supported capital cities")]
    pub async fn current_weather_all_major_cities(&self) -> Result<CallToolResult, McpError> {
        let all = self.service.current_weather_all_major_cities().await?;
        json_result(&all)
    }

    #[rmcp::tool(description = "Get current Bureau of Meteorology weather warnings")]
    pub async fn current_warnings(&self) -> Result<CallToolResult, McpError> {
        let warnings = self.service.current_warnings().await?;
        json_result(&warnings)
    }
}

#[rmcp::tool_handler]
impl ServerHandler for BomWeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Australian weather from Bureau of Meteorology bulletins. Supported cities: \
                 Sydney, Melbourne, Adelaide, Brisbane, Darwin, Perth, Hobart."
                    .into(),
            ),
        }
    }
}

//! rmcp-bom-weather: MCP server for Bureau of Meteorology weather bulletins
//!
//! Run with: `rmcp-bom-weather` (serves on stdio). Set `BOM_WEATHER_CONFIG`
//! to a TOML file to override the transport settings.

use rmcp::ServiceExt;
use rmcp_bom_weather::{BomWeatherServer, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (to stderr so it doesn't interfere with stdio transport)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::info!(transport = ?config.transport, "Starting rmcp-bom-weather server");

    let server = BomWeatherServer::new(&config)?;
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    tracing::info!("rmcp-bom-weather server stopped");
    Ok(())
}

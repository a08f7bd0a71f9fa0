//! bom-weather - Australian weather bulletins for AI assistants
//!
//! Serves the weather tools over stdio (default) or streamable HTTP.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use rmcp_bom_weather::{BomWeatherServer, Config, WeatherService};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "bom-weather", version, about = "BoM weather bulletins as MCP tools")]
struct Cli {
    /// Serve on stdin/stdout (default)
    #[arg(long, conflicts_with = "http")]
    stdio: bool,

    /// Serve streamable HTTP at /mcp
    #[arg(long)]
    http: bool,

    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 4242)]
    port: u16,

    /// TOML config file; environment variables still override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the registered tools as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

#[derive(Serialize)]
struct ToolSummary {
    server: &'static str,
    version: &'static str,
    tools: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load(Some(path))?,
        None => Config::from_env()?,
    };
    let server = BomWeatherServer::new(&config)?;

    if cli.list_tools {
        let summary = ToolSummary {
            server: "bom-weather",
            version: env!("CARGO_PKG_VERSION"),
            tools: server.tool_names(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    // clap rejects --stdio together with --http
    if cli.http && !cli.stdio {
        serve_http(server.service().clone(), &cli.host, cli.port).await
    } else {
        tracing::info!(transport = ?config.transport, "bom-weather starting on stdio");
        let service = server.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

async fn serve_http(service: WeatherService, host: &str, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    let mcp_service = StreamableHttpService::new(
        move || Ok(BomWeatherServer::with_service(service.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", mcp_service);

    let bind_addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("bom-weather listening on http://{}/mcp", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    tracing::info!("bom-weather stopped");
    Ok(())
}

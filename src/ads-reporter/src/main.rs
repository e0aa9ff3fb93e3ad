//! Ads Reporter — pulls ad-level insight data from the Meta Graph API
//! and serves lead/CPL rollup reports over HTTP.

use adreport_api::ApiServer;
use adreport_core::config::AppConfig;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ads-reporter")]
#[command(about = "Meta ads lead/CPL reporting service")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "ADS_REPORTER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "ADS_REPORTER__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Graph API base URL (overrides config)
    #[arg(long, env = "ADS_REPORTER__META__BASE_URL")]
    graph_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ads_reporter=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Ads Reporter starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(base_url) = cli.graph_base_url {
        config.meta.base_url = base_url;
    }

    info!(
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        graph_base_url = %config.meta.base_url,
        "Configuration loaded"
    );

    let server = ApiServer::new(Arc::new(config));

    // Start metrics exporter
    if let Err(e) = server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Ads Reporter is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    server.start_http().await?;

    Ok(())
}

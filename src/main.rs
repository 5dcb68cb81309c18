use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cineproxy::{
    config::{Config, defaults::CATALOG_API_KEY_ENV},
    services::PlaybackResolver,
    sources::{HttpStreamSourceClient, TmdbCatalogClient},
    utils::HttpClientFactory,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "cineproxy")]
#[command(version)]
#[command(about = "Stream resolution and same-origin playback proxy")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (defaults to $CONFIG_FILE, then config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("cineproxy={},tower_http=trace", cli.log_level)
    } else {
        format!("cineproxy={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cineproxy v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    if config.catalog.api_key.is_empty() {
        warn!(
            "No catalog API key configured (set catalog.api_key or {}); cross-reference lookups will fail",
            CATALOG_API_KEY_ENV
        );
    }

    let factory = HttpClientFactory::new(&config);
    let catalog = Arc::new(TmdbCatalogClient::new(
        factory.create_api_client(config.catalog.request_timeout)?,
        config.catalog.clone(),
    ));
    let streams = Arc::new(HttpStreamSourceClient::new(
        factory.create_api_client(config.stream_source.request_timeout)?,
        config.stream_source.base_url.clone(),
    ));
    let resolver = PlaybackResolver::new(catalog.clone(), catalog, streams);
    let proxy_client = factory.create_proxy_client(&config.proxy)?;

    info!(
        "Catalog provider: {}, stream provider: {}",
        config.catalog.base_url, config.stream_source.base_url
    );

    let shutdown = CancellationToken::new();
    let state = AppState {
        config: Arc::new(config),
        resolver,
        proxy_client,
        shutdown: shutdown.clone(),
    };

    let web_server = WebServer::new(state)?;
    info!("Web server listening on {}:{}", web_server.host(), web_server.port());

    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();
    let server_token = shutdown.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server
            .serve_with_cancellation(server_ready_tx, server_token)
            .await
        {
            tracing::error!("Web server failed: {}", e);
        }
    });

    match server_ready_rx.await {
        Ok(Ok(())) => info!("Web server is ready"),
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => anyhow::bail!("Web server exited before signalling readiness"),
    }

    wait_for_shutdown_signal().await?;
    shutdown.cancel();

    server_handle.await?;
    info!("Shutdown complete");
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
            _ = sigint.recv() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down gracefully");
    }

    Ok(())
}

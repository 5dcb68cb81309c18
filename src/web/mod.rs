//! Web layer module
//!
//! HTTP interface of cineproxy:
//! - **Handlers**: thin request handlers delegating to the resolver and proxy
//! - **Responses**: the `ApiResponse` envelope and error-to-status mapping
//! - **Middleware**: request logging

use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::proxy::PROXY_PATH;
use crate::services::PlaybackResolver;

pub mod handlers;
pub mod middleware;
pub mod responses;

pub use responses::ApiResponse;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: PlaybackResolver,
    /// Pooled client shared by every proxied playback
    pub proxy_client: reqwest::Client,
    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            PROXY_PATH,
            get(handlers::proxy::proxy_stream).head(handlers::proxy::proxy_stream),
        )
        .route(
            "/api/v1/playback/{kind}/{catalog_id}",
            get(handlers::playback::resolve_playback),
        )
        .route(
            "/api/v1/player/{kind}/{catalog_id}",
            get(handlers::playback::player_view),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", state.config.web.host, state.config.web.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

        Ok(Self {
            app: create_router(state),
            addr,
        })
    }

    /// Serve until `cancellation_token` fires, then drain gracefully.
    ///
    /// `ready_signal` reports whether the listener could be bound.
    pub async fn serve_with_cancellation(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
        cancellation_token: CancellationToken,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                let shutdown_signal = async move {
                    cancellation_token.cancelled().await;
                    tracing::info!("Web server received cancellation signal, shutting down gracefully");
                };

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal)
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

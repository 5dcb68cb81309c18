//! Shared fixtures: in-process upstream servers and app state wiring.

#![allow(dead_code)]

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use cineproxy::{
    config::Config,
    services::PlaybackResolver,
    sources::{HttpStreamSourceClient, TmdbCatalogClient},
    utils::HttpClientFactory,
    web::{AppState, create_router},
};

/// Serve `router` on an ephemeral local port
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Counts requests that reached an upstream
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn test_config(catalog_base: &str, stream_base: &str) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = catalog_base.to_string();
    config.catalog.api_key = "test-key".to_string();
    config.stream_source.base_url = stream_base.to_string();
    config
}

pub fn app_state(config: Config) -> AppState {
    let factory = HttpClientFactory::new(&config);
    let catalog = Arc::new(TmdbCatalogClient::new(
        factory
            .create_api_client(config.catalog.request_timeout)
            .unwrap(),
        config.catalog.clone(),
    ));
    let streams = Arc::new(HttpStreamSourceClient::new(
        factory
            .create_api_client(config.stream_source.request_timeout)
            .unwrap(),
        config.stream_source.base_url.clone(),
    ));

    AppState {
        proxy_client: factory.create_proxy_client(&config.proxy).unwrap(),
        resolver: PlaybackResolver::new(catalog.clone(), catalog, streams),
        config: Arc::new(config),
        shutdown: CancellationToken::new(),
    }
}

pub fn app(config: Config) -> Router {
    create_router(app_state(config))
}

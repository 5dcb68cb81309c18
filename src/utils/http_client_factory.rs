//! HTTP Client Factory
//!
//! Builds the `reqwest` clients used for outbound calls. Each concern gets
//! its own client so its timeouts are enforced by the client itself:
//! - catalog lookups and stream-source queries: bounded total request time
//! - playback proxy: connect and idle-read bounds only, since media bodies
//!   may legitimately stream for a long time

use reqwest::Client;
use std::time::Duration;

use crate::config::{Config, ProxyConfig};
use crate::errors::AppResult;

/// Factory for the outbound HTTP clients
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    user_agent: String,
    connect_timeout: Duration,
}

impl HttpClientFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            connect_timeout: config.proxy.connect_timeout,
        }
    }

    /// Client for small JSON API calls; `timeout` bounds the whole exchange
    pub fn create_api_client(&self, timeout: Duration) -> AppResult<Client> {
        tracing::debug!(
            "Creating API client (timeout={}, connect_timeout={})",
            humantime::format_duration(timeout),
            humantime::format_duration(self.connect_timeout)
        );
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .connect_timeout(self.connect_timeout)
            .timeout(timeout)
            .build()?;
        Ok(client)
    }

    /// Shared pooled client for the playback proxy.
    ///
    /// No total timeout: the proxy handler bounds the wait for the response
    /// head itself and `read_timeout` bounds stalls while the body streams.
    pub fn create_proxy_client(&self, proxy: &ProxyConfig) -> AppResult<Client> {
        tracing::debug!(
            "Creating proxy client (connect_timeout={}, read_timeout={}, pool_max_idle_per_host={})",
            humantime::format_duration(proxy.connect_timeout),
            humantime::format_duration(proxy.read_timeout),
            proxy.pool_max_idle_per_host
        );
        let client = Client::builder()
            .user_agent(proxy.user_agent.clone())
            .connect_timeout(proxy.connect_timeout)
            .read_timeout(proxy.read_timeout)
            .pool_max_idle_per_host(proxy.pool_max_idle_per_host)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_all_clients() {
        let config = Config::default();
        let factory = HttpClientFactory::new(&config);

        assert!(
            factory
                .create_api_client(config.catalog.request_timeout)
                .is_ok()
        );
        assert!(factory.create_proxy_client(&config.proxy).is_ok());
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub stream_source: StreamSourceConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Catalog metadata provider (TMDB-compatible REST API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Sent as the `api_key` query parameter on every catalog request
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_catalog_language")]
    pub language: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_image_original_base_url")]
    pub image_original_base_url: String,
    #[serde(default = "default_poster_placeholder")]
    pub poster_placeholder: String,
    #[serde(
        default = "default_catalog_request_timeout",
        with = "duration_serde::duration"
    )]
    pub request_timeout: Duration,
}

/// Third-party stream-resolution service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSourceConfig {
    /// Base URL the `/stream/...` paths are appended to
    #[serde(default = "default_stream_source_base_url")]
    pub base_url: String,
    #[serde(
        default = "default_stream_source_request_timeout",
        with = "duration_serde::duration"
    )]
    pub request_timeout: Duration,
}

/// Outbound settings for the playback proxy handler.
///
/// `upstream_timeout` bounds the wait for the origin's response head,
/// `read_timeout` bounds each idle gap while the body is streamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(
        default = "default_proxy_connect_timeout",
        with = "duration_serde::duration"
    )]
    pub connect_timeout: Duration,
    #[serde(
        default = "default_proxy_upstream_timeout",
        with = "duration_serde::duration"
    )]
    pub upstream_timeout: Duration,
    #[serde(
        default = "default_proxy_read_timeout",
        with = "duration_serde::duration"
    )]
    pub read_timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Catalog defaults
fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_catalog_language() -> String {
    DEFAULT_CATALOG_LANGUAGE.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_image_original_base_url() -> String {
    DEFAULT_IMAGE_ORIGINAL_BASE_URL.to_string()
}

fn default_poster_placeholder() -> String {
    DEFAULT_POSTER_PLACEHOLDER.to_string()
}

fn default_catalog_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS)
}

// Stream source defaults
fn default_stream_source_base_url() -> String {
    DEFAULT_STREAM_SOURCE_BASE_URL.to_string()
}

fn default_stream_source_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_STREAM_SOURCE_REQUEST_TIMEOUT_SECS)
}

// Proxy defaults
fn default_proxy_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROXY_CONNECT_TIMEOUT_SECS)
}

fn default_proxy_upstream_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROXY_UPSTREAM_TIMEOUT_SECS)
}

fn default_proxy_read_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROXY_READ_TIMEOUT_SECS)
}

fn default_user_agent() -> String {
    format!("cineproxy/{}", env!("CARGO_PKG_VERSION"))
}

fn default_pool_max_idle_per_host() -> usize {
    DEFAULT_PROXY_POOL_MAX_IDLE_PER_HOST
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            api_key: String::new(),
            language: default_catalog_language(),
            image_base_url: default_image_base_url(),
            image_original_base_url: default_image_original_base_url(),
            poster_placeholder: default_poster_placeholder(),
            request_timeout: default_catalog_request_timeout(),
        }
    }
}

impl Default for StreamSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_stream_source_base_url(),
            request_timeout: default_stream_source_request_timeout(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_proxy_connect_timeout(),
            upstream_timeout: default_proxy_upstream_timeout(),
            read_timeout: default_proxy_read_timeout(),
            user_agent: default_user_agent(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    /// Load configuration from a TOML file, writing the defaults there first
    /// when the file does not exist yet.
    ///
    /// # Errors
    /// `AppError::Io` when the file cannot be read or written,
    /// `AppError::Configuration` when it is not valid configuration TOML.
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        let mut config: Self = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents).map_err(|e| {
                AppError::configuration(format!("{config_file}: {e}"))
            })?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)
                .map_err(|e| AppError::configuration(e.to_string()))?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(CATALOG_API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                self.catalog.api_key = api_key.trim().to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 9000

            [stream_source]
            base_url = "http://streams.local/api"
            request_timeout = "5s"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.stream_source.base_url, "http://streams.local/api");
        assert_eq!(config.stream_source.request_timeout, Duration::from_secs(5));
        assert_eq!(config.catalog.language, DEFAULT_CATALOG_LANGUAGE);
        assert_eq!(
            config.proxy.upstream_timeout,
            Duration::from_secs(DEFAULT_PROXY_UPSTREAM_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_durations_accept_plain_seconds() {
        let config: Config = toml::from_str(
            r#"
            [proxy]
            connect_timeout = 3
            read_timeout = "1m30s"
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.proxy.read_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.proxy.user_agent, Config::default().proxy.user_agent);
        assert_eq!(
            parsed.catalog.request_timeout,
            Duration::from_secs(DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [proxy]
            upstream_timeout = "soon"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let path = std::env::temp_dir().join(format!("cineproxy-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[proxy]\nupstream_timeout = \"soon\"\n").unwrap();

        let err = Config::load_from_file(path.to_str().unwrap()).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("upstream_timeout"));
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let path = std::env::temp_dir().join(format!("cineproxy-{}.toml", uuid::Uuid::new_v4()));

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.web.port, DEFAULT_PORT);
        assert!(written.contains("[proxy]"));
    }
}

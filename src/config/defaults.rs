/// Configuration default values
///
/// All default values for configuration options live here so they can be
/// changed in one place.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Catalog metadata provider defaults
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_CATALOG_LANGUAGE: &str = "pt-BR";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";
pub const DEFAULT_IMAGE_ORIGINAL_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
pub const DEFAULT_POSTER_PLACEHOLDER: &str = "https://placehold.co/500x750/111111/1A1A1A?text=N/A";
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS: u64 = 10;

// Stream source provider defaults
pub const DEFAULT_STREAM_SOURCE_BASE_URL: &str = "http://127.0.0.1:7000/api";
pub const DEFAULT_STREAM_SOURCE_REQUEST_TIMEOUT_SECS: u64 = 15;

// Playback proxy defaults
pub const DEFAULT_PROXY_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROXY_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROXY_READ_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PROXY_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Environment variable that overrides `catalog.api_key`
pub const CATALOG_API_KEY_ENV: &str = "CINEPROXY_CATALOG_API_KEY";

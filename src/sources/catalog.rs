//! Catalog metadata provider client (TMDB-compatible REST API).
//!
//! Serves three lookups for a catalog id:
//! - `/{movie|tv}/{id}/external_ids` for the IMDb-style cross-reference
//! - `/{movie|tv}/{id}` for display details
//! - `/{movie|tv}/{id}/recommendations` for the recommendation row

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CatalogMetadata, CrossReferenceResolver};
use crate::config::CatalogConfig;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::models::{ExternalId, MediaDetails, MediaKind, MediaSummary, SeasonSummary};
use crate::utils::UrlUtils;

#[derive(Debug, Deserialize)]
struct ExternalIdsResponse {
    #[serde(default)]
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    results: Vec<CatalogMedia>,
}

#[derive(Debug, Deserialize)]
struct CatalogGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CatalogSeason {
    season_number: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    episode_count: u32,
}

/// Movie and TV payloads share one shape; movies use `title`/`release_date`,
/// series use `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
struct CatalogMedia {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    media_type: Option<String>,
    #[serde(default)]
    genres: Vec<CatalogGenre>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    seasons: Vec<CatalogSeason>,
}

/// HTTP client for the catalog metadata provider
#[derive(Debug, Clone)]
pub struct TmdbCatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl TmdbCatalogClient {
    pub fn new(client: Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, kind: MediaKind, catalog_id: &str, suffix: Option<&str>) -> String {
        let encoded_id = UrlUtils::encode_segment(catalog_id.trim());
        let mut segments = vec![kind.catalog_segment(), encoded_id.as_str()];
        if let Some(suffix) = suffix {
            segments.push(suffix);
        }

        format!(
            "{}?api_key={}&language={}",
            UrlUtils::join_segments(&self.config.base_url, &segments),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&self.config.language)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, String> {
        debug!("Catalog request: {}", UrlUtils::obfuscate_credentials(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("catalog provider unreachable: {}", without_url(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("catalog provider returned status {}", status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("catalog response could not be read: {}", without_url(e)))
    }

    fn poster_url(&self, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}{}", self.config.image_base_url, p),
            None => self.config.poster_placeholder.clone(),
        }
    }

    fn backdrop_url(&self, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}{}", self.config.image_original_base_url, p),
            None => String::new(),
        }
    }

    fn summarize(&self, media: &CatalogMedia, kind: MediaKind) -> MediaSummary {
        MediaSummary {
            id: media.id,
            title: media
                .title
                .clone()
                .or_else(|| media.name.clone())
                .unwrap_or_default(),
            poster: self.poster_url(media.poster_path.as_deref()),
            background: self.backdrop_url(media.backdrop_path.as_deref()),
            synopsis: media.overview.clone().unwrap_or_default(),
            year: release_year(media),
            kind,
        }
    }
}

/// Recommendations may mix kinds; fall back to the presence of a first-air date
fn infer_kind(media: &CatalogMedia) -> MediaKind {
    match media.media_type.as_deref() {
        Some("tv") => MediaKind::Series,
        Some("movie") => MediaKind::Movie,
        _ if media.first_air_date.is_some() => MediaKind::Series,
        _ => MediaKind::Movie,
    }
}

fn release_year(media: &CatalogMedia) -> String {
    media
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .or_else(|| media.first_air_date.as_deref().filter(|d| !d.is_empty()))
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_default()
}

/// reqwest errors embed the request URL, which carries the API key
fn without_url(error: reqwest::Error) -> String {
    error.without_url().to_string()
}

#[async_trait]
impl CrossReferenceResolver for TmdbCatalogClient {
    async fn resolve(&self, kind: MediaKind, catalog_id: &str) -> ResolutionResult<ExternalId> {
        if catalog_id.trim().is_empty() {
            return Err(ResolutionError::cross_reference(
                catalog_id,
                "catalog id is empty",
            ));
        }

        let url = self.endpoint(kind, catalog_id, Some("external_ids"));
        let ids: ExternalIdsResponse = self
            .get_json(&url)
            .await
            .map_err(|reason| ResolutionError::cross_reference(catalog_id, reason))?;

        match ids.imdb_id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => {
                debug!("Resolved {} {} to cross-reference {}", kind, catalog_id, id);
                Ok(ExternalId::new(id))
            }
            _ => Err(ResolutionError::cross_reference(
                catalog_id,
                "no IMDb id in external ids",
            )),
        }
    }
}

#[async_trait]
impl CatalogMetadata for TmdbCatalogClient {
    async fn details(&self, kind: MediaKind, catalog_id: &str) -> Option<MediaDetails> {
        let url = self.endpoint(kind, catalog_id, None);
        match self.get_json::<CatalogMedia>(&url).await {
            Ok(media) => Some(MediaDetails {
                summary: self.summarize(&media, kind),
                genres: media.genres.iter().map(|g| g.name.clone()).collect(),
                runtime: media
                    .runtime
                    .or_else(|| media.episode_run_time.first().copied()),
                seasons: media
                    .seasons
                    .iter()
                    .map(|s| SeasonSummary {
                        season_number: s.season_number,
                        name: s.name.clone(),
                        episode_count: s.episode_count,
                    })
                    .collect(),
            }),
            Err(reason) => {
                warn!("Details lookup failed for {} {}: {}", kind, catalog_id, reason);
                None
            }
        }
    }

    async fn recommendations(&self, kind: MediaKind, catalog_id: &str) -> Vec<MediaSummary> {
        let url = self.endpoint(kind, catalog_id, Some("recommendations"));
        match self.get_json::<RecommendationsResponse>(&url).await {
            Ok(page) => page
                .results
                .iter()
                .map(|media| self.summarize(media, infer_kind(media)))
                .collect(),
            Err(reason) => {
                warn!(
                    "Recommendations lookup failed for {} {}: {}",
                    kind, catalog_id, reason
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbCatalogClient {
        let config = CatalogConfig {
            base_url: "https://catalog.example/3/".to_string(),
            api_key: "k&y".to_string(),
            ..CatalogConfig::default()
        };
        TmdbCatalogClient::new(Client::new(), config)
    }

    fn media(json: serde_json::Value) -> CatalogMedia {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_id_and_query() {
        let url = client().endpoint(MediaKind::Series, "13 99/x", Some("external_ids"));
        assert_eq!(
            url,
            "https://catalog.example/3/tv/13%2099%2Fx/external_ids?api_key=k%26y&language=pt-BR"
        );
    }

    #[test]
    fn test_summary_uses_name_and_first_air_date_for_series() {
        let client = client();
        let item = media(serde_json::json!({
            "id": 1399,
            "name": "Some Show",
            "poster_path": "/p.jpg",
            "backdrop_path": null,
            "overview": "Overview",
            "first_air_date": "2011-04-17"
        }));

        let summary = client.summarize(&item, infer_kind(&item));
        assert_eq!(summary.title, "Some Show");
        assert_eq!(summary.year, "2011");
        assert_eq!(summary.kind, MediaKind::Series);
        assert_eq!(summary.poster, "https://image.tmdb.org/t/p/w342/p.jpg");
        assert_eq!(summary.background, "");
    }

    #[test]
    fn test_summary_falls_back_to_placeholder_poster() {
        let client = client();
        let item = media(serde_json::json!({
            "id": 550,
            "title": "A Film",
            "release_date": "",
            "media_type": "movie"
        }));

        let summary = client.summarize(&item, infer_kind(&item));
        assert_eq!(summary.poster, CatalogConfig::default().poster_placeholder);
        assert_eq!(summary.year, "");
        assert_eq!(summary.kind, MediaKind::Movie);
    }

    #[tokio::test]
    async fn test_empty_catalog_id_fails_without_request() {
        let err = client().resolve(MediaKind::Movie, "  ").await.unwrap_err();
        assert!(matches!(err, ResolutionError::CrossReference { .. }));
    }
}

//! Stream source provider client.
//!
//! Queries `{base}/stream/movie/{id}` or `{base}/stream/series/{id}/{s}/{e}`
//! and turns the provider's JSON into ordered [`StreamCandidate`]s.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::StreamSource;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::models::{ExternalId, ForwardHeaders, MediaTarget, StreamCandidate};
use crate::utils::UrlUtils;

/// Used when the provider returns an empty list without saying why
pub const NO_STREAMS_MESSAGE: &str = "No streams available for this title.";

#[derive(Debug, Deserialize)]
struct StreamApiResponse {
    #[serde(default)]
    streams: Option<Vec<WireStream>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStream {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    proxy_headers: Option<Value>,
}

impl WireStream {
    /// The provider's URL must be an absolute http(s) URL to be replayable
    fn into_candidate(self) -> Result<StreamCandidate, String> {
        let raw_url = self.url.unwrap_or_default();
        let target_url = UrlUtils::parse_http_url(&raw_url).map_err(|reason| {
            format!(
                "unusable stream URL '{}': {}",
                UrlUtils::obfuscate_credentials(&raw_url),
                reason
            )
        })?;

        Ok(StreamCandidate {
            display_name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            target_url,
            forward_headers: self
                .proxy_headers
                .map(decode_proxy_headers)
                .unwrap_or_default(),
        })
    }
}

/// Turn the provider's list into candidates without reordering it.
///
/// The first entry is the one that will be played, so an unusable URL there
/// fails the whole lookup. Unusable entries further down can never be
/// selected and are left out with a warning.
fn into_candidates(streams: Vec<WireStream>) -> ResolutionResult<Vec<StreamCandidate>> {
    let mut candidates = Vec::with_capacity(streams.len());
    for (position, stream) in streams.into_iter().enumerate() {
        match stream.into_candidate() {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) if position == 0 => return Err(ResolutionError::no_streams(reason)),
            Err(reason) => warn!("Ignoring stream #{}: {}", position, reason),
        }
    }
    Ok(candidates)
}

/// Providers send either `{"request": {...}, "response": {...}}` or a flat
/// header map. Only request headers are forwarded to the origin.
fn decode_proxy_headers(value: Value) -> ForwardHeaders {
    let Value::Object(mut object) = value else {
        return ForwardHeaders::NoHeaders;
    };

    let map = match object.remove("request") {
        Some(Value::Object(request)) => request,
        Some(other) => {
            object.insert("request".to_string(), other);
            object
        }
        None => object,
    };

    let headers: BTreeMap<String, String> = map
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Number(n) => Some((name, n.to_string())),
            Value::Bool(b) => Some((name, b.to_string())),
            _ => None,
        })
        .collect();

    ForwardHeaders::from_map(headers)
}

/// HTTP client for the stream source provider
#[derive(Debug, Clone)]
pub struct HttpStreamSourceClient {
    client: Client,
    base_url: String,
}

impl HttpStreamSourceClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn streams_url(&self, external_id: &ExternalId, target: MediaTarget) -> String {
        let id = UrlUtils::encode_segment(external_id.as_str());
        match target {
            MediaTarget::Movie => {
                UrlUtils::join_segments(&self.base_url, &["stream", "movie", &id])
            }
            MediaTarget::Series { season, episode } => UrlUtils::join_segments(
                &self.base_url,
                &[
                    "stream",
                    "series",
                    &id,
                    &season.to_string(),
                    &episode.to_string(),
                ],
            ),
        }
    }
}

#[async_trait]
impl StreamSource for HttpStreamSourceClient {
    async fn fetch_streams(
        &self,
        external_id: &ExternalId,
        target: MediaTarget,
    ) -> ResolutionResult<Vec<StreamCandidate>> {
        let url = self.streams_url(external_id, target);
        debug!("Fetching streams: {}", UrlUtils::obfuscate_credentials(&url));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Stream provider returned {} for {}", status, external_id);
            return Err(ResolutionError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body: StreamApiResponse = response.json().await.map_err(|e| {
            let is_decode = e.is_decode();
            let e = e.without_url();
            if is_decode {
                ResolutionError::no_streams(format!("Malformed stream provider response: {e}"))
            } else {
                ResolutionError::transport(e.to_string())
            }
        })?;

        if let Some(message) = body.error.filter(|m| !m.trim().is_empty()) {
            debug!("Stream provider reported an error for {}: {}", external_id, message);
            return Err(ResolutionError::no_streams(message));
        }

        let streams = body.streams.unwrap_or_default();
        if streams.is_empty() {
            return Err(ResolutionError::no_streams(NO_STREAMS_MESSAGE));
        }

        let candidates = into_candidates(streams)?;
        debug!("Stream provider offered {} candidate(s) for {}", candidates.len(), external_id);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::num::NonZeroU32;
    use tracing_test::traced_test;

    fn wire(value: Value) -> WireStream {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_streams_url_for_movie_and_episode() {
        let client = HttpStreamSourceClient::new(Client::new(), "http://provider.local/api/");
        let id = ExternalId::new("tt0133093");

        assert_eq!(
            client.streams_url(&id, MediaTarget::Movie),
            "http://provider.local/api/stream/movie/tt0133093"
        );

        let episode = MediaTarget::Series {
            season: NonZeroU32::new(2).unwrap(),
            episode: NonZeroU32::new(5).unwrap(),
        };
        assert_eq!(
            client.streams_url(&id, episode),
            "http://provider.local/api/stream/series/tt0133093/2/5"
        );
    }

    #[test]
    fn test_nested_request_headers_are_unwrapped() {
        let headers = decode_proxy_headers(json!({
            "request": { "Referer": "https://origin.example/", "X-Token": 42 },
            "response": { "Content-Type": "video/mp4" }
        }));

        let map = headers.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Referer"], "https://origin.example/");
        assert_eq!(map["X-Token"], "42");
    }

    #[test]
    fn test_flat_headers_are_accepted() {
        let headers = decode_proxy_headers(json!({ "User-Agent": "Mozilla/5.0" }));
        assert_eq!(headers.as_map().unwrap()["User-Agent"], "Mozilla/5.0");
    }

    #[test]
    fn test_empty_or_invalid_headers_collapse() {
        assert_eq!(decode_proxy_headers(json!({})), ForwardHeaders::NoHeaders);
        assert_eq!(decode_proxy_headers(json!("nope")), ForwardHeaders::NoHeaders);
        assert_eq!(
            decode_proxy_headers(json!({ "request": {} })),
            ForwardHeaders::NoHeaders
        );
    }

    #[test]
    fn test_unusable_first_stream_fails_instead_of_falling_back() {
        let streams = vec![
            wire(json!({ "name": "ftp", "url": "ftp://cdn.example/a.mp4" })),
            wire(json!({ "name": "http", "url": "http://cdn.example/b.mp4" })),
        ];

        let err = into_candidates(streams).unwrap_err();

        assert_eq!(err.stage(), crate::errors::ResolutionStage::NoStreams);
        assert!(err.user_message().contains("ftp://cdn.example/a.mp4"));
    }

    #[test]
    fn test_missing_first_url_fails() {
        let streams = vec![
            wire(json!({ "name": "no url" })),
            wire(json!({ "url": "https://cdn.example/b.mp4" })),
        ];

        assert!(matches!(
            into_candidates(streams),
            Err(ResolutionError::NoStreams { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_later_unusable_stream_keeps_order() {
        let streams = vec![
            wire(json!({
                "name": "Server 1",
                "description": "1080p",
                "url": "https://cdn.example/a.mp4"
            })),
            wire(json!({ "name": "bad", "url": "file:///etc/passwd" })),
            wire(json!({ "name": "Server 3", "url": "https://cdn.example/c.mp4" })),
        ];

        let candidates = into_candidates(streams).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].display_name, "Server 1");
        assert_eq!(candidates[0].target_url.as_str(), "https://cdn.example/a.mp4");
        assert_eq!(candidates[0].forward_headers, ForwardHeaders::NoHeaders);
        assert_eq!(candidates[1].display_name, "Server 3");
        assert!(logs_contain("Ignoring stream #1"));
    }

    #[test]
    fn test_null_streams_with_error_decodes() {
        let body: StreamApiResponse =
            serde_json::from_value(json!({ "streams": null, "error": "not available" })).unwrap();

        assert!(body.streams.is_none());
        assert_eq!(body.error.as_deref(), Some("not available"));
    }
}

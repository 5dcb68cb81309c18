//! Decoding of the `/proxy` query string.

use std::collections::BTreeMap;

use url::Url;

use super::url_builder::{HEADERS_PARAM, VIDEO_URL_PARAM};
use crate::errors::{ProxyError, ProxyResult};
use crate::models::ForwardHeaders;
use crate::utils::UrlUtils;

/// What the proxy handler replays: an origin URL plus the headers it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub target_url: Url,
    pub forward_headers: ForwardHeaders,
}

impl ProxyRequest {
    /// Decode a raw (still percent-encoded) query string.
    ///
    /// The first occurrence of each parameter wins; unknown parameters are
    /// ignored. A `headers` parameter that is present decodes to
    /// `ForwardHeaders::Headers` even when the object is empty.
    ///
    /// # Errors
    /// `ProxyError::BadRequest` when `videoUrl` is missing, blank, relative
    /// or not http(s), or when `headers` is not a JSON object of strings.
    pub fn from_query(query: &str) -> ProxyResult<Self> {
        let mut video_url: Option<String> = None;
        let mut headers: Option<String> = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                VIDEO_URL_PARAM if video_url.is_none() => video_url = Some(value.into_owned()),
                HEADERS_PARAM if headers.is_none() => headers = Some(value.into_owned()),
                _ => {}
            }
        }

        let raw_url = video_url
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProxyError::bad_request("missing videoUrl parameter"))?;

        let target_url = UrlUtils::parse_http_url(&raw_url)
            .map_err(|reason| ProxyError::bad_request(format!("invalid videoUrl: {reason}")))?;

        let forward_headers = match headers {
            None => ForwardHeaders::NoHeaders,
            Some(raw) => {
                let map: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
                    ProxyError::bad_request(format!(
                        "headers must be a JSON object of string values: {e}"
                    ))
                })?;
                ForwardHeaders::Headers(map)
            }
        };

        Ok(Self {
            target_url,
            forward_headers,
        })
    }
}

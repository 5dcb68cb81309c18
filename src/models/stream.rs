//! Stream candidates offered by the stream source provider.

use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Request headers the playback origin requires (referrer, tokens, ...).
///
/// Values are opaque: they are carried through the proxy URL and replayed
/// verbatim by the proxy handler, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum ForwardHeaders {
    #[default]
    NoHeaders,
    Headers(BTreeMap<String, String>),
}

impl ForwardHeaders {
    /// An empty map carries nothing to forward and collapses to `NoHeaders`
    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        if map.is_empty() {
            ForwardHeaders::NoHeaders
        } else {
            ForwardHeaders::Headers(map)
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ForwardHeaders::NoHeaders => None,
            ForwardHeaders::Headers(map) => Some(map),
        }
    }
}

/// One playable source for a title or episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCandidate {
    pub display_name: String,
    pub description: String,
    pub target_url: Url,
    pub forward_headers: ForwardHeaders,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_collapses_to_no_headers() {
        assert_eq!(
            ForwardHeaders::from_map(BTreeMap::new()),
            ForwardHeaders::NoHeaders
        );
        assert!(ForwardHeaders::NoHeaders.as_map().is_none());
    }

    #[test]
    fn test_headers_keep_values() {
        let mut map = BTreeMap::new();
        map.insert("Referer".to_string(), "https://origin.example/".to_string());
        let headers = ForwardHeaders::from_map(map.clone());

        assert_eq!(headers.as_map(), Some(&map));
    }
}

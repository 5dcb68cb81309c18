//! Same-origin playback URL construction.
//!
//! The player element cannot attach custom headers, so the origin URL and
//! its headers travel as query parameters of a relative `/proxy` URL.

use crate::models::{ForwardHeaders, PlaybackUrl, StreamCandidate};

pub const PROXY_PATH: &str = "/proxy";
pub const VIDEO_URL_PARAM: &str = "videoUrl";
pub const HEADERS_PARAM: &str = "headers";

/// Build `/proxy?videoUrl=<pct>[&headers=<pct(json)>]` for a candidate.
///
/// Every byte outside the unreserved set is percent-encoded, so neither
/// `&`, `=`, `#` nor control characters from the target URL or the header
/// values can break out of their parameter.
pub fn build_proxy_url(candidate: &StreamCandidate) -> PlaybackUrl {
    let mut url = format!(
        "{PROXY_PATH}?{VIDEO_URL_PARAM}={}",
        urlencoding::encode(candidate.target_url.as_str())
    );

    if let ForwardHeaders::Headers(headers) = &candidate.forward_headers {
        // A string map always serializes
        if let Ok(json) = serde_json::to_string(headers) {
            url.push('&');
            url.push_str(HEADERS_PARAM);
            url.push('=');
            url.push_str(&urlencoding::encode(&json));
        }
    }

    PlaybackUrl::new(url)
}

//! Which headers cross the proxy in each direction.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::errors::{ProxyError, ProxyResult};
use crate::models::ForwardHeaders;

/// Origin response headers copied back to the player
pub static FORWARDED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
];

/// Hop-by-hop headers plus those the HTTP client must own
const FORBIDDEN_FORWARD_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Build the outbound header set for the origin request.
///
/// Decoded headers are attached verbatim. The inbound `Range` is added
/// unless the decoded headers already carry one. `User-Agent` is left to the
/// client default when the decoded headers carry none.
///
/// # Errors
/// `ProxyError::BadRequest` for invalid header names or values (control
/// characters included) and for hop-by-hop, `host` or `content-length`.
pub fn build_origin_headers(
    forward: &ForwardHeaders,
    inbound: &HeaderMap,
) -> ProxyResult<HeaderMap> {
    let mut outbound = HeaderMap::new();

    if let Some(map) = forward.as_map() {
        for (name, value) in map {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| ProxyError::bad_request(format!("invalid header name '{name}'")))?;

            if FORBIDDEN_FORWARD_HEADERS.contains(&header_name.as_str()) {
                return Err(ProxyError::bad_request(format!(
                    "header '{header_name}' cannot be forwarded"
                )));
            }

            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ProxyError::bad_request(format!("invalid value for header '{header_name}'"))
            })?;

            outbound.insert(header_name, header_value);
        }
    }

    if !outbound.contains_key(header::RANGE) {
        if let Some(range) = inbound.get(header::RANGE) {
            outbound.insert(header::RANGE, range.clone());
        }
    }

    Ok(outbound)
}

/// Copy the allow-listed origin headers into the player response
pub fn copy_response_headers(origin: &HeaderMap, response: &mut HeaderMap) {
    for name in FORWARDED_RESPONSE_HEADERS.iter() {
        if let Some(value) = origin.get(name) {
            response.insert(name.clone(), value.clone());
        }
    }
}

/// CORS and caching headers the proxy adds to every response it produces
pub fn apply_proxy_headers(response: &mut HeaderMap) {
    response.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    response.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Range, Accept"),
    );
    response.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Length, Content-Range, Accept-Ranges"),
    );
}

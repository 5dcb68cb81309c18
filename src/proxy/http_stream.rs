//! Streaming replay of a decoded proxy request against its origin.
//!
//! Key behaviors:
//!   - One shared pooled client; connect and idle-read bounds come from it.
//!   - The wait for the origin's response head is bounded by
//!     `proxy.upstream_timeout`; the body then streams with no total bound.
//!   - Only allow-listed origin headers reach the player, plus the proxy's
//!     own CORS and `cache-control` headers.
//!   - Dropping the returned body (player gone) drops the origin connection.

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Response};
use futures::StreamExt;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::header_policy::{apply_proxy_headers, build_origin_headers, copy_response_headers};
use super::request::ProxyRequest;
use crate::errors::{ProxyError, ProxyResult};
use crate::utils::UrlUtils;

/// Replay `request` to its origin and stream the answer back.
///
/// `HEAD` is replayed as `HEAD`; every other method as `GET`.
///
/// # Errors
/// - `ProxyError::BadRequest` - forwarded headers rejected, nothing sent
/// - `ProxyError::OriginUnreachable` - transport failure or head timeout
/// - `ProxyError::OriginStatus` - origin answered with a non-success status
pub async fn proxy_http_stream(
    client: &Client,
    request: &ProxyRequest,
    method: &Method,
    inbound_headers: &HeaderMap,
    upstream_timeout: Duration,
) -> ProxyResult<Response<Body>> {
    let safe_url = UrlUtils::obfuscate_credentials(request.target_url.as_str());
    let outbound_headers = build_origin_headers(&request.forward_headers, inbound_headers)?;

    let is_head = *method == Method::HEAD;
    let outbound = if is_head {
        client.head(request.target_url.clone())
    } else {
        client.get(request.target_url.clone())
    };

    debug!(
        "Replaying {} {} with {} header(s)",
        if is_head { "HEAD" } else { "GET" },
        safe_url,
        outbound_headers.len()
    );

    let upstream = match tokio::time::timeout(
        upstream_timeout,
        outbound.headers(outbound_headers).send(),
    )
    .await
    {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            let e = e.without_url();
            error!("Failed to connect to origin {}: {}", safe_url, e);
            return Err(ProxyError::origin_unreachable(e.to_string()));
        }
        Err(_) => {
            error!(
                "Origin {} sent no response within {}",
                safe_url,
                humantime::format_duration(upstream_timeout)
            );
            return Err(ProxyError::origin_unreachable(format!(
                "no response within {}",
                humantime::format_duration(upstream_timeout)
            )));
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        error!("Origin responded with error status {} for {}", status, safe_url);
        return Err(ProxyError::OriginStatus {
            status: status.as_u16(),
        });
    }

    let origin_headers = upstream.headers().clone();
    let body = if is_head {
        Body::empty()
    } else {
        let stream_url = safe_url.clone();
        Body::from_stream(upstream.bytes_stream().inspect(move |chunk| {
            if let Err(e) = chunk {
                warn!("Origin stream {} interrupted: {}", stream_url, e);
            }
        }))
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    copy_response_headers(&origin_headers, response.headers_mut());
    apply_proxy_headers(response.headers_mut());

    info!("Streaming proxy established for {} ({})", safe_url, status);
    Ok(response)
}

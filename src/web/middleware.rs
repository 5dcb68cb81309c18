//! HTTP middleware

use axum::{
    extract::Request,
    http::{Method, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, debug, field, info, info_span, warn};

use crate::proxy::PROXY_PATH;
use crate::proxy::url_builder::VIDEO_URL_PARAM;
use crate::utils::UrlUtils;

/// Request logging middleware
///
/// Every request runs inside a `request` span carrying a generated id, the
/// method and the path. Proxy requests also record the origin host, so
/// stream failures can be grouped by CDN without logging the signed URL.
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    // Query strings carry origin URLs and their headers
    let span = info_span!(
        "request",
        id = %uuid::Uuid::new_v4(),
        method = %method,
        path = %uri.path(),
        origin = field::Empty,
    );
    if let Some(origin) = proxy_origin(&uri) {
        span.record("origin", field::display(&origin));
    }

    async move {
        debug!("HTTP request started");

        let response = next.run(request).await;
        let status = response.status();
        let duration_ms = start.elapsed().as_millis();

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, "HTTP request completed with error");
        } else {
            info!(status = status.as_u16(), duration_ms, "HTTP request completed");
        }
        response
    }
    .instrument(span)
    .await
}

/// Host of the `videoUrl` a proxy request targets
fn proxy_origin(uri: &Uri) -> Option<String> {
    if uri.path() != PROXY_PATH {
        return None;
    }
    url::form_urlencoded::parse(uri.query()?.as_bytes())
        .find(|(key, _)| key == VIDEO_URL_PARAM)
        .and_then(|(_, value)| UrlUtils::extract_domain(&value))
}

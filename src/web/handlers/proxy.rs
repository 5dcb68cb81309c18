//! Playback proxy handler (`GET|HEAD /proxy?videoUrl=..&headers=..`)

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, Method, Response},
};
use tracing::warn;

use crate::errors::ProxyResult;
use crate::proxy::{ProxyRequest, proxy_http_stream};
use crate::web::AppState;

/// Decode the proxy parameters and stream the origin response back.
///
/// Parameter errors are answered before any outbound call is made.
pub async fn proxy_stream(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ProxyResult<Response<Body>> {
    let request = ProxyRequest::from_query(query.as_deref().unwrap_or_default())
        .inspect_err(|e| warn!("Rejected proxy request: {}", e))?;

    proxy_http_stream(
        &state.proxy_client,
        &request,
        &method,
        &headers,
        state.config.proxy.upstream_timeout,
    )
    .await
}

//! Resolution endpoints over the playback pipeline
//!
//! - `GET /api/v1/playback/{kind}/{catalog_id}` → proxy URL or typed error
//! - `GET /api/v1/player/{kind}/{catalog_id}` → display metadata plus outcome

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{MediaKind, PlaybackUrl, ResolutionRequest};
use crate::web::AppState;
use crate::web::responses::{bad_request, ok};

/// Optional episode coordinates; ignored for movies
#[derive(Debug, Default, Deserialize)]
pub struct EpisodeQuery {
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlaybackData {
    pub playback_url: PlaybackUrl,
}

fn parse_request(
    kind: &str,
    catalog_id: String,
    query: EpisodeQuery,
) -> Result<ResolutionRequest, Response> {
    let kind: MediaKind = kind.parse().map_err(|e: String| bad_request(&e))?;
    Ok(ResolutionRequest::new(
        kind,
        catalog_id,
        query.season,
        query.episode,
    ))
}

pub async fn resolve_playback(
    State(state): State<AppState>,
    Path((kind, catalog_id)): Path<(String, String)>,
    Query(query): Query<EpisodeQuery>,
) -> Response {
    let request = match parse_request(&kind, catalog_id, query) {
        Ok(request) => request,
        Err(response) => return response,
    };
    debug!("Resolving playback for {:?}", request);

    let cancel = state.shutdown.child_token();
    match state.resolver.resolve(&request, &cancel).await {
        Ok(playback_url) => ok(PlaybackData { playback_url }).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn player_view(
    State(state): State<AppState>,
    Path((kind, catalog_id)): Path<(String, String)>,
    Query(query): Query<EpisodeQuery>,
) -> Response {
    let request = match parse_request(&kind, catalog_id, query) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let cancel = state.shutdown.child_token();
    Json(state.resolver.player_view(&request, &cancel).await).into_response()
}

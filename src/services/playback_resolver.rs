//! Playback resolution pipeline.
//!
//! `resolve` runs cross-reference → stream fetch → selection → proxy URL
//! strictly in sequence and stops at the first failure. `player_view` adds
//! the display lookups for a player page around the same pipeline.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::stream_selector::select_stream;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::models::{ExternalId, PlaybackUrl, PlayerView, ResolutionRequest};
use crate::proxy::build_proxy_url;
use crate::sources::stream_source::NO_STREAMS_MESSAGE;
use crate::sources::{CatalogMetadata, CrossReferenceResolver, StreamSource};
use crate::utils::UrlUtils;

/// Resolves a catalog id into a same-origin playback URL
#[derive(Clone)]
pub struct PlaybackResolver {
    cross_reference: Arc<dyn CrossReferenceResolver>,
    metadata: Arc<dyn CatalogMetadata>,
    streams: Arc<dyn StreamSource>,
}

impl PlaybackResolver {
    pub fn new(
        cross_reference: Arc<dyn CrossReferenceResolver>,
        metadata: Arc<dyn CatalogMetadata>,
        streams: Arc<dyn StreamSource>,
    ) -> Self {
        Self {
            cross_reference,
            metadata,
            streams,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    /// The first stage failure, or `ResolutionError::Cancelled` once `cancel`
    /// fires. The in-flight outbound call is dropped on cancellation.
    pub async fn resolve(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> ResolutionResult<PlaybackUrl> {
        let external_id = with_cancel(
            cancel,
            self.cross_reference
                .resolve(request.kind(), &request.catalog_id),
        )
        .await?;

        self.playback_for(&external_id, request, cancel).await
    }

    /// Display metadata plus the playback outcome for a player page.
    ///
    /// Details, recommendations and the cross-reference run concurrently;
    /// the stream fetch starts only after all three have finished. Display
    /// lookups never affect the playback outcome. Cancellation drops all
    /// three lookups at once and yields an empty, cancelled view.
    pub async fn player_view(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> PlayerView {
        let kind = request.kind();
        let catalog_id = request.catalog_id.as_str();

        let lookups = async {
            tokio::join!(
                self.metadata.details(kind, catalog_id),
                self.metadata.recommendations(kind, catalog_id),
                self.cross_reference.resolve(kind, catalog_id),
            )
        };
        let (details, recommendations, external_id) = tokio::select! {
            biased;
            _ = cancel.cancelled() => (None, Vec::new(), Err(ResolutionError::Cancelled)),
            results = lookups => results,
        };

        let playback = match external_id {
            Ok(external_id) => self.playback_for(&external_id, request, cancel).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &playback {
            warn!("Playback unavailable for {} {}: {}", kind, catalog_id, e);
        }

        PlayerView {
            details,
            recommendations,
            playback: playback.into(),
        }
    }

    async fn playback_for(
        &self,
        external_id: &ExternalId,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> ResolutionResult<PlaybackUrl> {
        let candidates =
            with_cancel(cancel, self.streams.fetch_streams(external_id, request.target)).await?;

        let chosen = select_stream(&candidates)
            .ok_or_else(|| ResolutionError::no_streams(NO_STREAMS_MESSAGE))?;
        debug!(
            "Selected stream '{}' of {} for {}",
            chosen.display_name,
            candidates.len(),
            external_id
        );

        let url = build_proxy_url(chosen);
        info!(
            "Resolved {} {} to {}",
            request.kind(),
            request.catalog_id,
            UrlUtils::obfuscate_credentials(chosen.target_url.as_str())
        );
        Ok(url)
    }
}

/// Race a pipeline stage against the cancellation token
async fn with_cancel<T, F>(cancel: &CancellationToken, stage: F) -> ResolutionResult<T>
where
    F: Future<Output = ResolutionResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ResolutionError::Cancelled),
        result = stage => result,
    }
}

//! Clients for the two upstream collaborators of the playback pipeline:
//! the catalog metadata provider and the stream source provider.
//!
//! The pipeline only depends on the traits below, so tests can swap the HTTP
//! clients for mocks.

use async_trait::async_trait;

use crate::errors::ResolutionResult;
use crate::models::{ExternalId, MediaDetails, MediaKind, MediaSummary, MediaTarget, StreamCandidate};

pub mod catalog;
pub mod stream_source;

pub use catalog::TmdbCatalogClient;
pub use stream_source::HttpStreamSourceClient;

/// Maps a catalog id to the cross-reference id the stream provider understands
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrossReferenceResolver: Send + Sync {
    /// # Errors
    /// `ResolutionError::CrossReference` when the provider is unreachable,
    /// answers with a non-success status, or has no usable cross-reference.
    async fn resolve(&self, kind: MediaKind, catalog_id: &str) -> ResolutionResult<ExternalId>;
}

/// Read-only display lookups served by the catalog provider.
///
/// Failures are not errors for the caller: they degrade to `None` / empty.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogMetadata: Send + Sync {
    async fn details(&self, kind: MediaKind, catalog_id: &str) -> Option<MediaDetails>;

    async fn recommendations(&self, kind: MediaKind, catalog_id: &str) -> Vec<MediaSummary>;
}

/// Queries the stream-resolution service for playable candidates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Returns the provider's candidates in provider preference order.
    ///
    /// # Errors
    /// - `ResolutionError::Transport` - provider unreachable or timed out
    /// - `ResolutionError::UpstreamStatus` - non-success HTTP status
    /// - `ResolutionError::NoStreams` - explicit provider error or nothing playable
    async fn fetch_streams(
        &self,
        external_id: &ExternalId,
        target: MediaTarget,
    ) -> ResolutionResult<Vec<StreamCandidate>>;
}

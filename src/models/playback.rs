//! Request and result types of the playback resolution pipeline.

use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;

use super::{MediaDetails, MediaKind, MediaSummary};
use crate::errors::{ResolutionError, ResolutionStage};

/// Which concrete piece of media to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTarget {
    Movie,
    Series {
        season: NonZeroU32,
        episode: NonZeroU32,
    },
}

impl MediaTarget {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaTarget::Movie => MediaKind::Movie,
            MediaTarget::Series { .. } => MediaKind::Series,
        }
    }
}

/// A single playback resolution request.
///
/// Series coordinates fall back to season 1 / episode 1 independently when
/// absent or zero; coordinates given for a movie are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub catalog_id: String,
    pub target: MediaTarget,
}

impl ResolutionRequest {
    pub fn new(
        kind: MediaKind,
        catalog_id: impl Into<String>,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Self {
        match kind {
            MediaKind::Movie => Self::movie(catalog_id),
            MediaKind::Series => Self::series(catalog_id, season, episode),
        }
    }

    pub fn movie(catalog_id: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            target: MediaTarget::Movie,
        }
    }

    pub fn series(catalog_id: impl Into<String>, season: Option<u32>, episode: Option<u32>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            target: MediaTarget::Series {
                season: coordinate_or_first(season),
                episode: coordinate_or_first(episode),
            },
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.target.kind()
    }
}

fn coordinate_or_first(value: Option<u32>) -> NonZeroU32 {
    value.and_then(NonZeroU32::new).unwrap_or(NonZeroU32::MIN)
}

/// Provider cross-reference id (IMDb-style), distinct from the catalog id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative same-origin URL handed to the player element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlaybackUrl(String);

impl PlaybackUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaybackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializable form of a resolution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    Ready {
        url: PlaybackUrl,
    },
    Failed {
        stage: ResolutionStage,
        message: String,
    },
}

impl From<Result<PlaybackUrl, ResolutionError>> for PlaybackOutcome {
    fn from(result: Result<PlaybackUrl, ResolutionError>) -> Self {
        match result {
            Ok(url) => PlaybackOutcome::Ready { url },
            Err(e) => PlaybackOutcome::Failed {
                stage: e.stage(),
                message: e.user_message(),
            },
        }
    }
}

/// Everything a player page needs: display metadata plus the playback outcome
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub details: Option<MediaDetails>,
    pub recommendations: Vec<MediaSummary>,
    pub playback: PlaybackOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 1)]
    #[case(Some(3), None, 3, 1)]
    #[case(None, Some(7), 1, 7)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(2), Some(5), 2, 5)]
    fn test_series_coordinates_default_independently(
        #[case] season: Option<u32>,
        #[case] episode: Option<u32>,
        #[case] expected_season: u32,
        #[case] expected_episode: u32,
    ) {
        let request = ResolutionRequest::series("1399", season, episode);
        match request.target {
            MediaTarget::Series { season, episode } => {
                assert_eq!(season.get(), expected_season);
                assert_eq!(episode.get(), expected_episode);
            }
            MediaTarget::Movie => panic!("expected series target"),
        }
    }

    #[test]
    fn test_series_without_coordinates_equals_first_episode() {
        assert_eq!(
            ResolutionRequest::series("1399", None, None),
            ResolutionRequest::series("1399", Some(1), Some(1))
        );
    }

    #[test]
    fn test_movie_ignores_coordinates() {
        let request = ResolutionRequest::new(MediaKind::Movie, "550", Some(2), Some(3));
        assert_eq!(request.target, MediaTarget::Movie);
        assert_eq!(request.kind(), MediaKind::Movie);
    }

    #[test]
    fn test_outcome_serialization() {
        let ready = PlaybackOutcome::from(Ok(PlaybackUrl::new("/proxy?videoUrl=x")));
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            serde_json::json!({ "status": "ready", "url": "/proxy?videoUrl=x" })
        );

        let failed = PlaybackOutcome::from(Err(ResolutionError::no_streams("not available")));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({
                "status": "failed",
                "stage": "no_streams",
                "message": "not available"
            })
        );
    }
}

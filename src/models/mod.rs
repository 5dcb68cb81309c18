use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod media;
pub mod playback;
pub mod stream;

pub use media::{MediaDetails, MediaSummary, SeasonSummary};
pub use playback::{
    ExternalId, MediaTarget, PlaybackOutcome, PlaybackUrl, PlayerView, ResolutionRequest,
};
pub use stream::{ForwardHeaders, StreamCandidate};

/// Kind of title being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Path segment used by the catalog metadata provider
    pub fn catalog_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// Path segment used by the stream source provider
    pub fn stream_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream_segment())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    /// Accepts both provider vocabularies (`series` and the catalog's `tv`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            other => Err(format!("Unknown media kind: {other}")),
        }
    }
}

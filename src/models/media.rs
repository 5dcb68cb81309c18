//! Display metadata from the catalog provider, consumed by player pages.

use serde::Serialize;

use super::MediaKind;

/// Compact card-style summary, used for recommendation rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    pub id: u64,
    pub title: String,
    pub poster: String,
    pub background: String,
    pub synopsis: String,
    pub year: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub name: String,
    pub episode_count: u32,
}

/// Full details for the title being played
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDetails {
    #[serde(flatten)]
    pub summary: MediaSummary,
    pub genres: Vec<String>,
    /// Runtime in minutes (first episode runtime for series)
    pub runtime: Option<u32>,
    pub seasons: Vec<SeasonSummary>,
}

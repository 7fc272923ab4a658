/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// The response from the TVMaze singlesearch endpoint.
///
/// Only the identifier is needed, everything else is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// The TVMaze show identifier
    pub id: u64,
}

/// A single episode from the TVMaze episode list endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    /// The TVMaze episode identifier
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number (0 for specials)
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Air date as YYYY-MM-DD (may be null or empty)
    pub airdate: Option<String>,
    /// Poster images (may be null)
    pub image: Option<TvMazeImage>,
}

/// Image URLs of an episode.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

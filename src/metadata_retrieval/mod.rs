/// Data structures and traits for TV show metadata retrieval.
///
/// This module provides structures to represent shows and their episodes
/// as delivered by a remote metadata provider, as well as the trait that
/// provider implementations fulfill.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{TVMAZE_BASE_URL, TvMazeProvider};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the metadata provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested show was not found
    #[error("Show not found: {0}")]
    SeriesNotFound(String),
}

/// A TV show as known to the metadata provider.
///
/// The identifier is assigned by the provider and is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Provider-assigned identifier
    pub id: u64,
    /// Display name of the show
    pub name: String,
}

/// Image URLs attached to an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeImage {
    /// Medium resolution variant
    pub medium: Option<String>,
    /// Full resolution variant
    pub original: Option<String>,
}

/// A single episode exactly as the provider describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Provider-assigned episode identifier
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season number this episode belongs to (0 for specials)
    pub season: u32,
    /// The episode number within the season (0 when the provider has none)
    pub number: u32,
    /// Episode summary in HTML markup
    pub summary: Option<String>,
    /// Original air date as `YYYY-MM-DD`
    pub airdate: Option<String>,
    /// Poster images, if the provider has any
    pub image: Option<EpisodeImage>,
}

/// Trait for metadata providers that can look up shows and their episodes.
///
/// Implementors talk to a remote episode database. Both calls are fallible
/// and blocking.
pub trait MetadataProvider {
    /// Resolves a free-text show name to the provider's best match.
    ///
    /// # Arguments
    ///
    /// * `show_name` - The name as typed by the user
    ///
    /// # Returns
    ///
    /// The identifier of the best matching show, or a MetadataRetrievalError
    fn resolve_show(&self, show_name: &str) -> Result<u64, MetadataRetrievalError>;

    /// Fetches the full, ordered episode list of a show.
    fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, MetadataRetrievalError>;
}

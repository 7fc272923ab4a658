//! Random Episode Finder - Let chance pick the next episode to watch
//!
//! This library looks up a TV show on TVMaze, loads its episodes and draws
//! one at random from a chosen season range. Favorite shows are remembered
//! across sessions.

mod catalog;
mod config;
mod controller;
mod favorites;
mod metadata_retrieval;
mod repository;
mod selection;
mod storage;

pub use catalog::{CatalogShow, MAX_SUGGESTIONS, SHOW_CATALOG, random_show, suggestions};
pub use config::{DEFAULT_SELECTION_DELAY, FinderConfig};
pub use controller::{
    AppState, Controller, Event, LookupError, Phase, SeasonRange, SubmitOptions, reduce,
};
pub use favorites::{FAVORITES_SLOT, FavoritesStore};
pub use metadata_retrieval::{
    Episode, EpisodeImage, MetadataProvider, Show, TVMAZE_BASE_URL, TvMazeProvider,
};
pub use repository::{EpisodeRepository, SUMMARY_FALLBACK, sanitize_summary};
pub use selection::{
    FormattedEpisode, SeasonCount, format_airdate, format_episode, placeholder_image_url,
    select_random, select_random_with, summarize_seasons,
};
pub use storage::SlotStorage;

// Re-export error types
pub use metadata_retrieval::MetadataRetrievalError;
pub use storage::StorageError;

//! Episode repository
//!
//! This module wraps a metadata provider with a per-session episode cache
//! and turns provider failures into the fallbacks the rest of the
//! application works with: an absent identifier or an empty episode list.

use crate::metadata_retrieval::{Episode, MetadataProvider};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Text shown in place of a missing or empty episode summary.
pub const SUMMARY_FALLBACK: &str = "No summary available.";

/// A caching front for a metadata provider
///
/// Episode lists are cached in memory keyed by show identifier. Entries
/// never expire within a session; failed fetches leave no entry behind so
/// that a later call may try again.
pub struct EpisodeRepository<P>
where
    P: MetadataProvider,
{
    /// The underlying metadata provider
    provider: P,
    /// Episode lists by show identifier
    cache: Mutex<HashMap<u64, Vec<Episode>>>,
}

impl<P> EpisodeRepository<P>
where
    P: MetadataProvider,
{
    /// Creates a new repository wrapping the given provider
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let repository = EpisodeRepository::new(TvMazeProvider::new());
    /// let episodes = repository.fetch_episodes(169);
    /// ```
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a free-text show name to the provider's identifier
    ///
    /// Returns `None` when the provider reports no match or the request
    /// fails. Both cases are logged.
    pub fn resolve_show_id(&self, show_name: &str) -> Option<u64> {
        match self.provider.resolve_show(show_name) {
            Ok(show_id) => {
                debug!(show_name, show_id, "resolved show");
                Some(show_id)
            }
            Err(e) => {
                warn!(show_name, error = %e, "could not resolve show");
                None
            }
        }
    }

    /// Returns the episode list of a show, fetching it on first use
    ///
    /// A failed fetch yields an empty list and is not cached. The lock is
    /// not held across the network call, so two concurrent first calls for
    /// the same show both reach the provider; whichever finishes last
    /// overwrites an identical entry.
    pub fn fetch_episodes(&self, show_id: u64) -> Vec<Episode> {
        if let Some(episodes) = self.cached(show_id) {
            debug!(show_id, count = episodes.len(), "episode cache hit");
            return episodes;
        }

        match self.provider.fetch_episodes(show_id) {
            Ok(episodes) => {
                debug!(show_id, count = episodes.len(), "fetched episodes");
                self.cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(show_id, episodes.clone());
                episodes
            }
            Err(e) => {
                warn!(show_id, error = %e, "could not fetch episodes");
                Vec::new()
            }
        }
    }

    /// Looks up a cached episode list
    fn cached(&self, show_id: u64) -> Option<Vec<Episode>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&show_id)
            .cloned()
    }
}

/// Converts an HTML episode summary to plain text
///
/// Tags are stripped, entities decoded and line endings normalized to
/// `\n`. Missing, empty or whitespace-only summaries become
/// [`SUMMARY_FALLBACK`].
pub fn sanitize_summary(markup: Option<&str>) -> String {
    let text = markup
        .map(|html| {
            nanohtml2text::html2text(html)
                .replace("\r\n", "\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    if text.is_empty() {
        SUMMARY_FALLBACK.to_string()
    } else {
        text
    }
}

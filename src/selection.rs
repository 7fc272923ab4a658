//! Random episode selection
//!
//! This module filters an episode list down to a season range, draws one
//! episode uniformly at random and turns it into a display-ready record.

use crate::metadata_retrieval::Episode;
use crate::repository::sanitize_summary;
use chrono::NaiveDate;
use rand::Rng;
use std::collections::BTreeMap;

/// An episode prepared for display
///
/// Created fresh for every selection and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedEpisode {
    pub id: u64,
    pub name: String,
    pub season: u32,
    pub number: u32,
    /// Plain text summary, never empty
    pub summary: String,
    /// Poster URL, either the provider's or a placeholder
    pub image: String,
    pub airdate: Option<String>,
    /// The show this episode belongs to
    pub show_name: String,
}

impl FormattedEpisode {
    /// Returns the `SxxEyy` code of this episode
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }
}

/// Number of episodes in one season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonCount {
    pub season: u32,
    pub count: usize,
}

/// Picks a random episode within an inclusive season range
///
/// Uses the thread-local random number generator. See
/// [`select_random_with`] for details.
pub fn select_random(
    episodes: &[Episode],
    min_season: u32,
    max_season: u32,
    show_name: &str,
) -> Option<FormattedEpisode> {
    select_random_with(&mut rand::rng(), episodes, min_season, max_season, show_name)
}

/// Picks a random episode within an inclusive season range
///
/// Every episode with `min_season <= season <= max_season` has the same
/// chance of being picked. Returns `None` if `episodes` is empty or no
/// episode falls into the range.
///
/// # Arguments
///
/// * `rng` - Source of randomness
/// * `episodes` - The full episode list of a show
/// * `min_season` - Lowest season to consider
/// * `max_season` - Highest season to consider
/// * `show_name` - Name to attach to the result
pub fn select_random_with<R>(
    rng: &mut R,
    episodes: &[Episode],
    min_season: u32,
    max_season: u32,
    show_name: &str,
) -> Option<FormattedEpisode>
where
    R: Rng + ?Sized,
{
    if episodes.is_empty() {
        return None;
    }

    let candidates: Vec<&Episode> = episodes
        .iter()
        .filter(|episode| (min_season..=max_season).contains(&episode.season))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.random_range(0..candidates.len());
    Some(format_episode(candidates[index], show_name))
}

/// Builds the display record for a raw episode
pub fn format_episode(episode: &Episode, show_name: &str) -> FormattedEpisode {
    let image = episode
        .image
        .as_ref()
        .and_then(|image| image.original.clone())
        .unwrap_or_else(|| placeholder_image_url(episode.id));

    FormattedEpisode {
        id: episode.id,
        name: episode.name.clone(),
        season: episode.season,
        number: episode.number,
        summary: sanitize_summary(episode.summary.as_deref()),
        image,
        airdate: episode.airdate.clone(),
        show_name: show_name.to_string(),
    }
}

/// Deterministic placeholder poster for episodes without an image
pub fn placeholder_image_url(episode_id: u64) -> String {
    format!("https://picsum.photos/seed/{}/1280/720", episode_id)
}

/// Counts episodes per season
///
/// The result is sorted by season. Seasons without episodes are absent.
pub fn summarize_seasons(episodes: &[Episode]) -> Vec<SeasonCount> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();

    for episode in episodes {
        *counts.entry(episode.season).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(season, count)| SeasonCount { season, count })
        .collect()
}

/// Formats a `YYYY-MM-DD` air date as e.g. "January 20, 2008"
///
/// Dates that do not parse are returned unchanged.
pub fn format_airdate(airdate: &str) -> String {
    NaiveDate::parse_from_str(airdate, "%Y-%m-%d")
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| airdate.to_string())
}

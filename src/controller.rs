//! Application controller
//!
//! The controller owns the application state and drives the
//! search-then-select workflow. State changes go through the pure
//! [`reduce`] function; the [`Controller`] performs the lookups and feeds
//! their outcome back in as [`Event`]s.

use crate::catalog::{self, CatalogShow};
use crate::config::FinderConfig;
use crate::favorites::{FAVORITES_SLOT, FavoritesStore};
use crate::metadata_retrieval::{Episode, MetadataProvider, Show, TvMazeProvider};
use crate::repository::EpisodeRepository;
use crate::selection::{FormattedEpisode, SeasonCount, select_random_with, summarize_seasons};
use crate::storage::SlotStorage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::mem;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Failures surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The show could not be resolved, or the provider was unreachable
    #[error("Show not found.")]
    ShowNotFound,

    /// The show exists but has no episodes
    #[error("Could not find episodes for this show.")]
    NoEpisodes,

    /// The season range excludes every episode
    #[error("No episodes found in the selected season range.")]
    NoEpisodesInRange,
}

/// Where the application currently is in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Resolving a show and loading its episodes
    Searching,
    /// A show is loaded and an episode can be drawn
    Ready,
    /// Drawing a random episode
    Selecting,
    /// A random episode is on display
    HasResult,
    /// The last action failed; see [`AppState::error`]
    Error,
}

/// Inclusive season bounds for random selection
///
/// `1 <= min <= max <= total` holds after every adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    pub min: u32,
    pub max: u32,
    /// Highest season of the loaded show
    pub total: u32,
}

impl SeasonRange {
    /// The range covering seasons `1..=total`
    pub fn full(total: u32) -> Self {
        let total = total.max(1);
        Self {
            min: 1,
            max: total,
            total,
        }
    }

    /// Moves the lower bound, pulling the upper bound up if needed
    pub fn with_min(self, min: u32) -> Self {
        let min = min.clamp(1, self.total);
        Self {
            min,
            max: self.max.max(min),
            total: self.total,
        }
    }

    /// Moves the upper bound, pulling the lower bound down if needed
    pub fn with_max(self, max: u32) -> Self {
        let max = max.clamp(1, self.total);
        Self {
            min: self.min.min(max),
            max,
            total: self.total,
        }
    }
}

impl Default for SeasonRange {
    fn default() -> Self {
        Self::full(1)
    }
}

/// Everything the user interface renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub phase: Phase,
    pub search_term: String,
    pub show: Option<Show>,
    pub episodes: Vec<Episode>,
    pub seasons: Vec<SeasonCount>,
    pub range: SeasonRange,
    pub result: Option<FormattedEpisode>,
    pub error: Option<LookupError>,
}

impl AppState {
    /// Whether a lookup or draw is in progress
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Searching | Phase::Selecting)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The search text was edited
    SearchTermChanged(String),
    /// A show lookup began for the given name
    SearchStarted(String),
    /// The show was resolved and its episodes loaded
    ShowLoaded { show: Show, episodes: Vec<Episode> },
    /// The show lookup failed
    SearchFailed(LookupError),
    /// A random draw began
    SelectionStarted,
    /// A random draw produced an episode
    EpisodeSelected(FormattedEpisode),
    /// A random draw produced nothing
    SelectionFailed(LookupError),
    MinSeasonChanged(u32),
    MaxSeasonChanged(u32),
}

/// Applies an event to a state, returning the next state
pub fn reduce(mut state: AppState, event: Event) -> AppState {
    match event {
        Event::SearchTermChanged(term) => {
            if term.is_empty() {
                state = AppState::default();
            } else {
                state.search_term = term;
            }
        }
        Event::SearchStarted(name) => {
            state.phase = Phase::Searching;
            state.search_term = name;
            state.error = None;
            state.result = None;
        }
        Event::ShowLoaded { show, episodes } => {
            let highest_season = episodes.iter().map(|e| e.season).max().unwrap_or(1);
            state.phase = Phase::Ready;
            state.seasons = summarize_seasons(&episodes);
            state.range = SeasonRange::full(highest_season);
            state.show = Some(show);
            state.episodes = episodes;
        }
        Event::SearchFailed(error) => {
            state.phase = Phase::Error;
            state.error = Some(error);
            state.show = None;
            state.episodes.clear();
            state.seasons.clear();
            state.range = SeasonRange::default();
        }
        Event::SelectionStarted => {
            if state.show.is_some() {
                state.phase = Phase::Selecting;
                state.error = None;
                state.result = None;
            }
        }
        Event::EpisodeSelected(episode) => {
            state.phase = Phase::HasResult;
            state.result = Some(episode);
        }
        Event::SelectionFailed(error) => {
            state.phase = Phase::Error;
            state.error = Some(error);
        }
        Event::MinSeasonChanged(min) => state.range = state.range.with_min(min),
        Event::MaxSeasonChanged(max) => state.range = state.range.with_max(max),
    }

    state
}

/// Options for [`Controller::submit_show_name`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Draw a random episode right after the show has loaded
    pub auto_select_after: bool,
}

/// Drives lookups, selection and favorites for one session
pub struct Controller<P>
where
    P: MetadataProvider,
{
    repository: EpisodeRepository<P>,
    favorites: FavoritesStore,
    state: AppState,
    rng: StdRng,
    selection_delay: Duration,
}

impl Controller<TvMazeProvider> {
    /// Creates a controller talking to TVMaze with persisted favorites
    ///
    /// If the favorites slot cannot be opened, favorites are kept in
    /// memory for this session only.
    pub fn from_config(config: &FinderConfig) -> Self {
        let slot = match &config.favorites_file {
            Some(path) => SlotStorage::open_file(path),
            None => SlotStorage::open(FAVORITES_SLOT),
        };

        let favorites = match slot {
            Ok(slot) => FavoritesStore::load(slot),
            Err(e) => {
                warn!(error = %e, "favorites will not be persisted");
                FavoritesStore::in_memory()
            }
        };

        Self::new(
            TvMazeProvider::with_base_url(&config.api_base_url),
            favorites,
            config,
        )
    }
}

impl<P> Controller<P>
where
    P: MetadataProvider,
{
    pub fn new(provider: P, favorites: FavoritesStore, config: &FinderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            repository: EpisodeRepository::new(provider),
            favorites,
            state: AppState::default(),
            rng,
            selection_delay: config.selection_delay,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn apply(&mut self, event: Event) {
        let state = mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    /// Updates the search text; an empty text resets the loaded show
    pub fn set_search_term(&mut self, term: &str) -> &AppState {
        self.apply(Event::SearchTermChanged(term.to_string()));
        &self.state
    }

    /// Catalog suggestions for the current search text
    pub fn suggestions(&self) -> Vec<CatalogShow> {
        catalog::suggestions(&self.state.search_term)
    }

    /// Looks up a show by name and loads its episodes
    ///
    /// On success the season range covers all seasons. With
    /// `auto_select_after` a random episode is drawn right away.
    pub fn submit_show_name(&mut self, name: &str, options: SubmitOptions) -> &AppState {
        self.apply(Event::SearchStarted(name.to_string()));

        match self.load_show(name) {
            Ok((show, episodes)) => {
                info!(show = %show.name, episodes = episodes.len(), "show loaded");
                self.apply(Event::ShowLoaded { show, episodes });
            }
            Err(error) => {
                info!(name, %error, "show lookup failed");
                self.apply(Event::SearchFailed(error));
            }
        }

        if options.auto_select_after && self.state.phase == Phase::Ready {
            self.request_random_episode();
        }

        &self.state
    }

    fn load_show(&self, name: &str) -> Result<(Show, Vec<Episode>), LookupError> {
        let id = self
            .repository
            .resolve_show_id(name)
            .ok_or(LookupError::ShowNotFound)?;

        let episodes = self.repository.fetch_episodes(id);
        if episodes.is_empty() {
            return Err(LookupError::NoEpisodes);
        }

        let show = Show {
            id,
            name: name.to_string(),
        };
        Ok((show, episodes))
    }

    /// Draws a random episode from the current season range
    ///
    /// Does nothing while no show is loaded.
    pub fn request_random_episode(&mut self) -> &AppState {
        let Some(show_name) = self.state.show.as_ref().map(|show| show.name.clone()) else {
            return &self.state;
        };

        self.apply(Event::SelectionStarted);

        if !self.selection_delay.is_zero() {
            thread::sleep(self.selection_delay);
        }

        let range = self.state.range;
        let picked = select_random_with(
            &mut self.rng,
            &self.state.episodes,
            range.min,
            range.max,
            &show_name,
        );

        let event = match picked {
            Some(episode) => Event::EpisodeSelected(episode),
            None if self.state.episodes.is_empty() => Event::SelectionFailed(LookupError::NoEpisodes),
            None => Event::SelectionFailed(LookupError::NoEpisodesInRange),
        };
        self.apply(event);

        &self.state
    }

    /// Picks a random catalog show, loads it and draws an episode
    pub fn surprise_me(&mut self) -> &AppState {
        let pick = catalog::random_show(&mut self.rng);
        info!(show = pick.name, "surprise pick");
        self.submit_show_name(
            pick.name,
            SubmitOptions {
                auto_select_after: true,
            },
        )
    }

    pub fn set_min_season(&mut self, min: u32) -> &AppState {
        self.apply(Event::MinSeasonChanged(min));
        &self.state
    }

    pub fn set_max_season(&mut self, max: u32) -> &AppState {
        self.apply(Event::MaxSeasonChanged(max));
        &self.state
    }

    pub fn favorites(&self) -> &[Show] {
        self.favorites.list()
    }

    /// Whether the loaded show is a favorite
    pub fn is_current_favorite(&self) -> bool {
        self.state
            .show
            .as_ref()
            .is_some_and(|show| self.favorites.is_favorite(show.id))
    }

    /// Toggles the loaded show in the favorites
    ///
    /// Returns the new favorite status, or `None` when no show is loaded.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let show = self.state.show.clone()?;
        Some(self.favorites.toggle(show))
    }

    pub fn add_favorite(&mut self, show: Show) {
        self.favorites.add(show);
    }

    /// Removes a favorite, returning whether it was present
    pub fn remove_favorite(&mut self, show_id: u64) -> bool {
        self.favorites.remove(show_id)
    }

    /// Loads a favorite show by name
    pub fn select_favorite(&mut self, show: &Show) -> &AppState {
        self.submit_show_name(&show.name, SubmitOptions::default())
    }

    /// Resolves a show name without touching the application state
    pub fn lookup_show(&self, name: &str) -> Option<Show> {
        self.repository.resolve_show_id(name).map(|id| Show {
            id,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SHOW_CATALOG;
    use crate::repository::tests::{FakeProvider, breaking_bad_episodes, episode};

    fn test_config() -> FinderConfig {
        FinderConfig {
            selection_delay: Duration::ZERO,
            seed: Some(11),
            ..FinderConfig::default()
        }
    }

    fn controller(provider: FakeProvider) -> Controller<FakeProvider> {
        Controller::new(provider, FavoritesStore::in_memory(), &test_config())
    }

    fn breaking_bad() -> FakeProvider {
        FakeProvider::new()
            .with_show("Breaking Bad", 169, breaking_bad_episodes())
            .with_show("Empty Show", 7, vec![])
    }

    #[test]
    fn test_season_range_adjustments() {
        let range = SeasonRange::full(5);
        assert_eq!(range, SeasonRange { min: 1, max: 5, total: 5 });

        let range = range.with_max(3).with_min(4);
        assert_eq!((range.min, range.max), (4, 4));

        let range = range.with_max(2);
        assert_eq!((range.min, range.max), (2, 2));

        let range = range.with_min(0).with_max(99);
        assert_eq!((range.min, range.max), (1, 5));
    }

    #[test]
    fn test_submit_loads_show() {
        let mut controller = controller(breaking_bad());
        let state = controller.submit_show_name("Breaking Bad", SubmitOptions::default());

        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.show.as_ref().map(|s| s.id), Some(169));
        assert_eq!(state.episodes.len(), 62);
        assert_eq!(state.range, SeasonRange::full(5));
        assert_eq!(state.seasons.len(), 5);
        assert_eq!(state.result, None);
    }

    #[test]
    fn test_season_one_range_only_yields_season_one() {
        let mut controller = controller(breaking_bad());
        controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        controller.set_max_season(1);

        for _ in 0..100 {
            let state = controller.request_random_episode();
            assert_eq!(state.phase, Phase::HasResult);
            let result = state.result.as_ref().unwrap();
            assert_eq!(result.season, 1);
            assert!(result.number <= 7);
        }
    }

    #[test]
    fn test_unknown_show_is_error() {
        let mut controller = controller(breaking_bad());
        controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        let state = controller.submit_show_name("No Such Show", SubmitOptions::default());

        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error, Some(LookupError::ShowNotFound));
        assert_eq!(state.show, None);
        assert!(state.episodes.is_empty());
    }

    #[test]
    fn test_show_without_episodes_is_error() {
        let mut controller = controller(breaking_bad());
        let state = controller.submit_show_name("Empty Show", SubmitOptions::default());

        assert_eq!(state.error, Some(LookupError::NoEpisodes));
        assert_eq!(
            state.error.as_ref().unwrap().to_string(),
            "Could not find episodes for this show."
        );
    }

    #[test]
    fn test_network_failure_looks_like_not_found() {
        let provider = breaking_bad();
        provider.failing.set(true);
        let mut controller = controller(provider);

        let state = controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        assert_eq!(state.error, Some(LookupError::ShowNotFound));
    }

    #[test]
    fn test_empty_range_is_error_and_retryable() {
        let provider = FakeProvider::new().with_show(
            "Gappy",
            1,
            vec![episode(1, 1, 1), episode(2, 3, 1)],
        );
        let mut controller = controller(provider);
        controller.submit_show_name("Gappy", SubmitOptions::default());
        controller.set_min_season(2);
        controller.set_max_season(2);

        let state = controller.request_random_episode();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error, Some(LookupError::NoEpisodesInRange));
        assert!(state.show.is_some());

        controller.set_max_season(3);
        let state = controller.request_random_episode();
        assert_eq!(state.phase, Phase::HasResult);
        assert_eq!(state.result.as_ref().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_clearing_search_resets_everything() {
        let mut controller = controller(breaking_bad());
        controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        controller.request_random_episode();

        let state = controller.set_search_term("");
        assert_eq!(state.show, None);
        assert!(state.episodes.is_empty());
        assert!(state.seasons.is_empty());
        assert_eq!(state.result, None);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_typing_keeps_loaded_show_and_updates_suggestions() {
        let mut controller = controller(breaking_bad());
        controller.submit_show_name("Breaking Bad", SubmitOptions::default());

        let state = controller.set_search_term("Game");
        assert!(state.show.is_some());
        assert_eq!(state.result, None);
        assert_eq!(controller.suggestions()[0].name, "Game of Thrones");
    }

    #[test]
    fn test_min_above_max_pulls_max_up() {
        let mut controller = controller(breaking_bad());
        controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        controller.set_max_season(2);

        let state = controller.set_min_season(4);
        assert_eq!((state.range.min, state.range.max), (4, 4));
    }

    #[test]
    fn test_plain_submit_does_not_auto_select() {
        let mut controller = controller(breaking_bad());
        let state = controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        assert_eq!(state.result, None);

        let state = controller.submit_show_name(
            "Breaking Bad",
            SubmitOptions {
                auto_select_after: true,
            },
        );
        assert_eq!(state.phase, Phase::HasResult);
        assert_eq!(
            state.result.as_ref().map(|r| r.show_name.as_str()),
            Some("Breaking Bad")
        );
    }

    #[test]
    fn test_surprise_me_loads_and_selects() {
        let mut provider = FakeProvider::new();
        for (index, show) in SHOW_CATALOG.iter().enumerate() {
            let base = index as u64 * 100;
            provider = provider.with_show(
                show.name,
                show.id,
                vec![episode(base + 1, 1, 1), episode(base + 2, 2, 1)],
            );
        }
        let mut controller = controller(provider);

        let state = controller.surprise_me();
        assert_eq!(state.phase, Phase::HasResult);
        let show = state.show.as_ref().unwrap();
        assert!(SHOW_CATALOG.iter().any(|entry| entry.name == show.name));
        assert_eq!(state.search_term, show.name);
        assert_eq!(state.result.as_ref().unwrap().show_name, show.name);
    }

    #[test]
    fn test_surprise_me_failure_does_not_select() {
        let mut controller = controller(FakeProvider::new());
        let state = controller.surprise_me();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.result, None);
    }

    #[test]
    fn test_select_without_show_is_noop() {
        let mut controller = controller(breaking_bad());
        let state = controller.request_random_episode();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.result, None);
    }

    #[test]
    fn test_toggle_favorite_for_loaded_show() {
        let mut controller = controller(breaking_bad());
        assert_eq!(controller.toggle_favorite(), None);

        controller.submit_show_name("Breaking Bad", SubmitOptions::default());
        assert_eq!(controller.toggle_favorite(), Some(true));
        assert!(controller.is_current_favorite());
        assert_eq!(controller.favorites().len(), 1);

        assert_eq!(controller.toggle_favorite(), Some(false));
        assert!(controller.favorites().is_empty());
    }

    #[test]
    fn test_select_favorite_loads_show() {
        let mut controller = controller(breaking_bad());
        let show = controller.lookup_show("Breaking Bad").unwrap();
        controller.add_favorite(show.clone());

        let state = controller.select_favorite(&show);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.show, Some(show));
    }

    #[test]
    fn test_reduce_ignores_selection_without_show() {
        let state = reduce(AppState::default(), Event::SelectionStarted);
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_reduce_search_started_clears_previous_outcome() {
        let state = AppState {
            phase: Phase::Error,
            error: Some(LookupError::ShowNotFound),
            ..AppState::default()
        };
        let state = reduce(state, Event::SearchStarted("Lost".to_string()));
        assert_eq!(state.phase, Phase::Searching);
        assert_eq!(state.error, None);
        assert_eq!(state.search_term, "Lost");
        assert!(state.is_busy());
    }

    #[test]
    fn test_favorites_file_in_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("favorites.json");
        let config = FinderConfig {
            favorites_file: Some(path.clone()),
            ..test_config()
        };

        let mut controller = Controller::from_config(&config);
        controller.add_favorite(Show {
            id: 169,
            name: "Breaking Bad".to_string(),
        });

        assert!(path.is_file());
        let reloaded = Controller::from_config(&config);
        assert_eq!(reloaded.favorites().len(), 1);
        assert!(!controller.favorites().is_empty());
    }
}

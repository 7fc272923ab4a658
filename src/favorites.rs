//! Favorite shows
//!
//! Favorites are kept in memory in insertion order and written back to a
//! persistent slot after every change. Persistence problems are logged and
//! otherwise ignored; the in-memory list stays authoritative for the session.

use crate::metadata_retrieval::Show;
use crate::storage::SlotStorage;
use tracing::{debug, error, warn};

/// Name of the persistent slot holding the favorites.
pub const FAVORITES_SLOT: &str = "favoriteShows";

/// The set of favorite shows, unique by show identifier
#[derive(Debug)]
pub struct FavoritesStore {
    shows: Vec<Show>,
    slot: Option<SlotStorage<Vec<Show>>>,
}

impl FavoritesStore {
    /// Loads the favorites from the given slot
    ///
    /// An absent, unreadable or corrupted slot yields an empty set.
    pub fn load(slot: SlotStorage<Vec<Show>>) -> Self {
        let stored = match slot.load() {
            Ok(Some(shows)) => shows,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not load favorites, starting empty");
                Vec::new()
            }
        };

        let mut store = Self {
            shows: Vec::with_capacity(stored.len()),
            slot: Some(slot),
        };
        for show in stored {
            if !store.is_favorite(show.id) {
                store.shows.push(show);
            }
        }

        debug!(count = store.shows.len(), "loaded favorites");
        store
    }

    /// Creates a store that is never persisted
    pub fn in_memory() -> Self {
        Self {
            shows: Vec::new(),
            slot: None,
        }
    }

    /// Adds a show unless one with the same identifier is already present
    pub fn add(&mut self, show: Show) {
        if self.is_favorite(show.id) {
            return;
        }
        self.shows.push(show);
        self.persist();
    }

    /// Removes the show with the given identifier, if present
    ///
    /// Returns whether a show was removed.
    pub fn remove(&mut self, show_id: u64) -> bool {
        let before = self.shows.len();
        self.shows.retain(|show| show.id != show_id);
        let removed = self.shows.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Adds the show if absent, removes it otherwise
    ///
    /// Returns whether the show is a favorite afterwards.
    pub fn toggle(&mut self, show: Show) -> bool {
        if self.is_favorite(show.id) {
            self.remove(show.id);
            false
        } else {
            self.add(show);
            true
        }
    }

    pub fn is_favorite(&self, show_id: u64) -> bool {
        self.shows.iter().any(|show| show.id == show_id)
    }

    /// Returns the favorites in the order they were added
    pub fn list(&self) -> &[Show] {
        &self.shows
    }

    /// Writes the full set back to the slot
    fn persist(&self) {
        let Some(slot) = &self.slot else {
            return;
        };

        if let Err(e) = slot.store(&self.shows) {
            error!(error = %e, "could not save favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn show(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_add_then_is_favorite() {
        let mut store = FavoritesStore::in_memory();
        store.add(show(169, "Breaking Bad"));
        assert!(store.is_favorite(169));
        assert!(!store.is_favorite(82));
    }

    #[test]
    fn test_remove_after_add() {
        let mut store = FavoritesStore::in_memory();
        store.add(show(169, "Breaking Bad"));
        assert!(store.remove(169));
        assert!(!store.is_favorite(169));

        // Removing an absent id is a no-op
        assert!(!store.remove(169));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_twice_keeps_size() {
        let mut store = FavoritesStore::in_memory();
        store.add(show(169, "Breaking Bad"));
        store.add(show(169, "Breaking Bad"));
        store.add(show(82, "Game of Thrones"));
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[1].name, "Game of Thrones");
    }

    #[test]
    fn test_toggle() {
        let mut store = FavoritesStore::in_memory();
        assert!(store.toggle(show(169, "Breaking Bad")));
        assert!(!store.toggle(show(169, "Breaking Bad")));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_favorites_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let slot = SlotStorage::open_in(dir.path(), FAVORITES_SLOT).unwrap();

        let mut store = FavoritesStore::load(slot);
        store.add(show(169, "Breaking Bad"));
        store.add(show(82, "Game of Thrones"));
        store.remove(169);

        let reloaded = FavoritesStore::load(SlotStorage::open_in(dir.path(), FAVORITES_SLOT).unwrap());
        assert_eq!(reloaded.list(), &[show(82, "Game of Thrones")]);
    }

    #[test]
    fn test_corrupted_slot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "definitely not json").unwrap();

        let store = FavoritesStore::load(SlotStorage::at(path));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file
        let slot = SlotStorage::at(dir.path().to_path_buf());

        let mut store = FavoritesStore::load(slot);
        store.add(show(169, "Breaking Bad"));
        assert!(store.is_favorite(169));
    }
}

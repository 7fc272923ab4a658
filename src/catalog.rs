//! Bundled show catalog
//!
//! A fixed list of well known shows used for search suggestions and the
//! surprise-me draw. Identifiers are TVMaze show ids.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Maximum number of suggestions returned for a search term.
pub const MAX_SUGGESTIONS: usize = 10;

/// An entry of the bundled catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogShow {
    pub id: u64,
    pub name: &'static str,
}

const fn entry(id: u64, name: &'static str) -> CatalogShow {
    CatalogShow { id, name }
}

pub const SHOW_CATALOG: &[CatalogShow] = &[
    entry(169, "Breaking Bad"),
    entry(82, "Game of Thrones"),
    entry(2993, "Stranger Things"),
    entry(526, "The Office"),
    entry(431, "Friends"),
    entry(83, "The Simpsons"),
    entry(618, "Better Call Saul"),
    entry(530, "Seinfeld"),
    entry(527, "The Sopranos"),
    entry(179, "The Wire"),
    entry(174, "Parks and Recreation"),
    entry(49, "Brooklyn Nine-Nine"),
    entry(216, "Rick and Morty"),
    entry(335, "Sherlock"),
    entry(123, "Lost"),
    entry(66, "The Big Bang Theory"),
    entry(73, "The Walking Dead"),
    entry(210, "Doctor Who"),
    entry(118, "House"),
    entry(305, "Black Mirror"),
    entry(1371, "Westworld"),
    entry(38963, "The Mandalorian"),
    entry(5, "True Detective"),
    entry(4, "Arrow"),
    entry(2, "Person of Interest"),
    entry(318, "Community"),
];

/// Returns catalog shows whose name contains `term`, ignoring case
///
/// At most [`MAX_SUGGESTIONS`] entries are returned, in catalog order. An
/// empty term yields no suggestions.
pub fn suggestions(term: &str) -> Vec<CatalogShow> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    SHOW_CATALOG
        .iter()
        .filter(|show| show.name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .copied()
        .collect()
}

/// Draws a show uniformly from the catalog
pub fn random_show<R>(rng: &mut R) -> CatalogShow
where
    R: Rng + ?Sized,
{
    // The catalog is a non-empty constant
    *SHOW_CATALOG.choose(rng).unwrap_or(&SHOW_CATALOG[0])
}

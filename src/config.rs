//! Runtime configuration
//!
//! The library reads no files and no environment variables; callers build a
//! [`FinderConfig`] and hand it to the controller.

use crate::metadata_retrieval::TVMAZE_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;

/// Default pause before a selected episode is revealed.
pub const DEFAULT_SELECTION_DELAY: Duration = Duration::from_millis(500);

/// Settings for a finder session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Base URL of the TVMaze compatible metadata API
    pub api_base_url: String,
    /// Cosmetic pause before a random episode is shown
    pub selection_delay: Duration,
    /// File holding the favorites; `None` uses the platform data directory
    pub favorites_file: Option<PathBuf>,
    /// Fixed seed for reproducible draws; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_base_url: TVMAZE_BASE_URL.to_string(),
            selection_delay: DEFAULT_SELECTION_DELAY,
            favorites_file: None,
            seed: None,
        }
    }
}

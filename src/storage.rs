//! Persistent slot storage
//!
//! This module provides a single named slot of JSON-serialized data stored
//! in the system's standard data directory, or in an explicitly given file.
//! The slot is read once and overwritten as a whole on every store.

use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during slot operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to determine data directory location
    #[error("Failed to determine data directory location")]
    DataDirectoryNotFound,

    /// Failed to create or access the data directory
    #[error("Failed to create data directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read the slot
    #[error("Failed to read slot file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the slot
    #[error("Failed to write slot file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The slot holds data that does not deserialize
    #[error("Failed to deserialize slot file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize data for storing
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A single persistent slot holding one serializable value
///
/// The value is stored as a JSON file named after the slot.
#[derive(Debug)]
pub struct SlotStorage<T> {
    /// The file backing this slot
    path: PathBuf,
    /// Phantom data for the generic type
    _phantom: PhantomData<T>,
}

impl<T> SlotStorage<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    /// Opens the named slot in the application's data directory
    ///
    /// The directory is created if it does not exist yet. The name is
    /// sanitized (lowercased, non-alphanumeric characters replaced with
    /// underscores).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let slot: SlotStorage<Vec<Show>> = SlotStorage::open("favoriteShows")?;
    /// ```
    pub fn open(name: &str) -> Result<Self, StorageError> {
        let proj_dirs =
            directories::ProjectDirs::from("", "", "random-episode-finder")
                .ok_or(StorageError::DataDirectoryNotFound)?;

        Self::open_in(proj_dirs.data_dir(), name)
    }

    /// Opens the named slot inside the given directory
    pub fn open_in(directory: &Path, name: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(directory).map_err(|e| StorageError::DirectoryCreationFailed {
            path: directory.to_path_buf(),
            source: e,
        })?;

        Ok(Self::at(
            directory.join(format!("{}.json", sanitize_name(name))),
        ))
    }

    /// Uses the given file as slot, creating its parent directory
    pub fn open_file(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Ok(Self::at(path.to_path_buf()))
    }

    /// Uses the given file as slot without touching the filesystem
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Loads the slot's value
    ///
    /// Returns `None` if the slot has never been written. Returns an error
    /// if the slot exists but cannot be read or deserialized.
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::ReadFailed {
            path: self.path.clone(),
            source: e,
        })?;

        let data =
            serde_json::from_str(&content).map_err(|e| StorageError::DeserializationFailed {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(Some(data))
    }

    /// Overwrites the slot with the given value
    pub fn store(&self, data: &T) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(data)?;

        fs::write(&self.path, content).map_err(|e| StorageError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Returns the path of the file backing this slot
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sanitizes a name for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("favoriteShows"), "favoriteshows");
        assert_eq!(sanitize_name("With Spaces"), "with_spaces");
        assert_eq!(sanitize_name("With-Hyphens"), "with-hyphens");
        assert_eq!(sanitize_name("Special!@#$%"), "special_____");
    }

    #[test]
    fn test_missing_slot_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot: SlotStorage<Vec<u32>> = SlotStorage::open_in(dir.path(), "numbers").unwrap();
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let slot: SlotStorage<Vec<u32>> = SlotStorage::open_in(dir.path(), "numbers").unwrap();

        slot.store(&vec![1, 2, 3]).unwrap();

        assert_eq!(slot.load().unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(slot.path(), dir.path().join("numbers.json"));
    }

    #[test]
    fn test_open_file_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("favorites.json");

        let slot: SlotStorage<Vec<u32>> = SlotStorage::open_file(&path).unwrap();
        slot.store(&vec![7]).unwrap();

        assert_eq!(slot.load().unwrap(), Some(vec![7]));
        assert!(path.is_file());
    }

    #[test]
    fn test_corrupted_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let slot: SlotStorage<Vec<u32>> = SlotStorage::at(path);
        assert!(matches!(
            slot.load(),
            Err(StorageError::DeserializationFailed { .. })
        ));
    }
}

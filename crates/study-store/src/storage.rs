//! Storage layer
//!
//! Stores a collection to disk as JSON for cross-session persistence.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use study_core::Result;

/// JSON file storage configuration and operations
pub struct JsonStorage {
    /// Path to the backing file
    path: PathBuf,
}

impl JsonStorage {
    /// Create storage at the default location (~/.config/study/<file_name>)
    pub fn default_location(file_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("study");

        std::fs::create_dir_all(&config_dir)?;

        Ok(Self {
            path: config_dir.join(file_name),
        })
    }

    /// Create storage at a specific path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the collection from disk.
    ///
    /// Returns `Ok(None)` when the file does not exist yet; malformed JSON
    /// is an error and left to the caller to interpret.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let value: T = serde_json::from_str(&content)?;

        Ok(Some(value))
    }

    /// Save the collection to disk
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(value)?;

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::at_path(dir.path().join("items.json"));

        let items = vec!["one".to_string(), "two".to_string()];
        storage.save(&items).unwrap();

        let loaded: Option<Vec<String>> = storage.load().unwrap();
        assert_eq!(loaded.unwrap(), items);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::at_path(dir.path().join("absent.json"));

        let loaded: Option<Vec<String>> = storage.load().unwrap();
        assert!(loaded.is_none());
        assert!(!storage.exists());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = JsonStorage::at_path(&path);
        let loaded: Result<Option<Vec<String>>> = storage.load();
        assert!(loaded.is_err());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::at_path(dir.path().join("items.json"));

        storage.save(&vec![1, 2, 3]).unwrap();
        assert!(storage.exists());
        assert!(!dir.path().join("items.json.tmp").exists());
    }
}

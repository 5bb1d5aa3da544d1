//! Local cache file
//!
//! Read-through cache at ~/.config/study/cache.json: session token,
//! cached user, theme preference, per-topic progress and slugs whose
//! deletion is still pending against the server. Server responses always
//! overwrite it; it is never a second source of truth.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use study_core::PublicUser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cache {
    pub token: Option<String>,
    pub user: Option<PublicUser>,
    pub theme: String,

    /// slug -> ("<level>-<index>" -> done)
    pub progress: HashMap<String, HashMap<String, bool>>,

    /// Deletions that failed against the server, retried on `sync`.
    pub pending_deletes: Vec<String>,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            theme: "light".to_string(),
            progress: HashMap::new(),
            pending_deletes: Vec::new(),
        }
    }
}

impl Cache {
    /// Default location (~/.config/study/cache.json)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("study")
            .join("cache.json")
    }

    /// Load the cache, starting fresh when the file is missing or
    /// damaged. Nothing in here is authoritative, so damage is not fatal.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                eprintln!("warning: unreadable cache file, starting fresh ({})", e);
                Self::default()
            }
        }
    }

    /// Save the cache to disk
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;

        // Write to temp file first, then rename (atomic)
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Flip one progress entry, returning its new value.
    pub fn toggle_progress(&mut self, slug: &str, key: &str) -> bool {
        let map = self.progress.entry(slug.to_string()).or_default();
        let entry = map.entry(key.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Queue a slug for deletion retry, without duplicates.
    pub fn queue_deletion(&mut self, slug: &str) {
        if !self.pending_deletes.iter().any(|s| s == slug) {
            self.pending_deletes.push(slug.to_string());
        }
    }

    /// Forget everything local about a topic after its server-side
    /// delete went through.
    pub fn drop_topic(&mut self, slug: &str) {
        self.progress.remove(slug);
        self.pending_deletes.retain(|s| s != slug);
    }
}

/// Completion percentage for one topic: done entries over total learning
/// points, capped so stale keys cannot push it past 100.
pub fn completion_percent(progress: Option<&HashMap<String, bool>>, total_items: usize) -> u32 {
    if total_items == 0 {
        return 0;
    }
    let done = progress
        .map(|map| map.values().filter(|done| **done).count())
        .unwrap_or(0)
        .min(total_items);
    (done * 100 / total_items) as u32
}

//! Processed-id cache — a bounded ordered set with insertion-order eviction.
//!
//! Keeps the ids of entries that have already been through the pipeline so
//! a feed item is only surfaced once. The window is deliberately small:
//! a feed page holds a few dozen entries, so ids that fell off the window
//! are also long gone from the feed itself.

use std::collections::VecDeque;
use std::path::Path;

use feedwarden_common::error::AppError;

/// Number of processed ids retained.
const DEFAULT_CAPACITY: usize = 50;

/// Bounded ordered set of already-processed entry ids.
///
/// Persisted as a plain JSON array so the cache file stays hand-editable.
#[derive(Debug)]
pub struct SeenCache {
    ids: VecDeque<String>,
    capacity: usize,
}

impl SeenCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Load the cache from `path`. A missing or unreadable file starts a
    /// fresh cache; so does an invalid one (logged, not an error).
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::info!(path = %path.display(), "No cache file found, starting fresh");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                let mut cache = Self::new();
                for id in ids {
                    cache.record(&id);
                }
                cache
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Cache file exists but is invalid, starting fresh"
                );
                Self::new()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    /// Record an id. Already-known ids keep their original position; once
    /// the capacity is exceeded the oldest id drops off.
    pub fn record(&mut self, id: &str) {
        if self.contains(id) {
            return;
        }
        self.ids.push_back(id.to_string());
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let ids: Vec<&String> = self.ids.iter().collect();
        std::fs::write(path, serde_json::to_string_pretty(&ids)?)?;
        Ok(())
    }
}

impl Default for SeenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_contains() {
        let mut cache = SeenCache::new();
        assert!(!cache.contains("a"));

        cache.record("a");
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_not_re_added() {
        let mut cache = SeenCache::new();
        cache.record("a");
        cache.record("b");
        cache.record("a");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_oldest_ids_evicted_at_capacity() {
        let mut cache = SeenCache::with_capacity(3);
        for id in ["a", "b", "c", "d", "e"] {
            cache.record(id);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
        assert!(cache.contains("e"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("processed.json");

        let mut cache = SeenCache::new();
        cache.record("guid-1");
        cache.record("guid-2");
        cache.save(&path).unwrap();

        let loaded = SeenCache::load(&path);
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains("guid-1"));
        assert!(loaded.contains("guid-2"));
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeenCache::load(&dir.path().join("does-not-exist.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json]").unwrap();

        let cache = SeenCache::load(&path);
        assert!(cache.is_empty());
    }
}

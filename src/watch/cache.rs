// src/watch/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Last observed state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// BLAKE3 hex digest, kept for files at or above the large-file threshold.
    Digest(String),
    /// Full content, kept for small files so a diff can be shown.
    Bytes(Vec<u8>),
}

/// In-memory record of what each changed file looked like the last time it
/// caused an action.
///
/// There is no entry for a path until its first change has been acted on.
/// Only the debounced change action touches the cache, so it needs no lock.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    /// Record `entry` as the latest known state of `path`.
    pub fn commit(&mut self, path: &Path, entry: CacheEntry) {
        debug!("updating content cache for {:?}", path);
        self.entries.insert(path.to_path_buf(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

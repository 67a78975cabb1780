// src/watch/filter.rs

//! Decides whether a reported change should lead to an action.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::watch::cache::{CacheEntry, ContentCache};
use crate::watch::diff::unified_diff;
use crate::watch::hash::compute_file_hash;
use crate::watch::patterns::PatternSet;

/// Files of this size or larger are compared by hash instead of by content.
pub const LARGE_FILE_THRESHOLD: u64 = 1 << 20;

/// Upper bound on the diff lines logged for a small-file change.
pub const DIFF_MAX_LINES: usize = 10;

/// Outcome of running a change through the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The path matches an exclude pattern; nothing else was looked at.
    Excluded { pattern: String },
    /// Content is identical to the version last acted on.
    Unchanged,
    /// Go ahead. `update` must be committed to the cache if, and only if,
    /// the action actually proceeds.
    Act { update: Option<CacheEntry> },
}

/// Exclude-pattern and (optional) content-verification filter.
///
/// The filter never mutates the cache itself; it only reads the previous
/// entry and hands back the replacement inside [`Verdict::Act`].
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    excludes: PatternSet,
    content_check: bool,
    fs: Arc<dyn FileSystem>,
}

impl ChangeFilter {
    pub fn new(excludes: PatternSet, content_check: bool, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            excludes,
            content_check,
            fs,
        }
    }

    pub fn from_config(cfg: &Config, fs: Arc<dyn FileSystem>) -> Self {
        Self::new(cfg.excludes().clone(), cfg.content_check(), fs)
    }

    /// The exclude pattern matching `rel_path`, if any.
    pub fn excluded_by(&self, rel_path: &str) -> Option<&str> {
        self.excludes.first_match(rel_path)
    }

    /// Classify a change to `path` (on disk) whose root-relative form is
    /// `rel_path`.
    ///
    /// I/O failures while verifying content are not errors: the file is
    /// treated as changed.
    pub fn check(&self, path: &Path, rel_path: &str, cache: &ContentCache) -> Verdict {
        if let Some(pattern) = self.excluded_by(rel_path) {
            return Verdict::Excluded {
                pattern: pattern.to_string(),
            };
        }

        if !self.content_check {
            return Verdict::Act { update: None };
        }

        let len = match self.fs.file_len(path) {
            Ok(len) => len,
            Err(err) => {
                debug!(path = %rel_path, error = %err, "failed to stat file; assuming changed");
                return Verdict::Act { update: None };
            }
        };

        if len >= LARGE_FILE_THRESHOLD {
            self.check_digest(path, rel_path, cache)
        } else {
            self.check_bytes(path, rel_path, cache)
        }
    }

    fn check_digest(&self, path: &Path, rel_path: &str, cache: &ContentCache) -> Verdict {
        let hash = match compute_file_hash(self.fs.as_ref(), path) {
            Ok(h) => h,
            Err(err) => {
                debug!(path = %rel_path, error = %err, "failed to hash file; assuming changed");
                return Verdict::Act { update: None };
            }
        };

        match cache.get(path) {
            Some(CacheEntry::Digest(prev)) if *prev == hash => Verdict::Unchanged,
            prev => {
                if prev.is_some() {
                    debug!(path = %rel_path, "content changed (file too large to diff)");
                }
                Verdict::Act {
                    update: Some(CacheEntry::Digest(hash)),
                }
            }
        }
    }

    fn check_bytes(&self, path: &Path, rel_path: &str, cache: &ContentCache) -> Verdict {
        let content = match self.fs.read(path) {
            Ok(c) => c,
            Err(err) => {
                debug!(path = %rel_path, error = %err, "failed to read file; assuming changed");
                return Verdict::Act { update: None };
            }
        };

        match cache.get(path) {
            Some(CacheEntry::Bytes(prev)) if *prev == content => Verdict::Unchanged,
            prev => {
                if let Some(CacheEntry::Bytes(old)) = prev {
                    debug!(
                        path = %rel_path,
                        "content changed\n{}",
                        unified_diff(old, &content, DIFF_MAX_LINES)
                    );
                }
                Verdict::Act {
                    update: Some(CacheEntry::Bytes(content)),
                }
            }
        }
    }
}

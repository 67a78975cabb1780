// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling include / exclude glob patterns.
//! - Resolving the target set once at startup.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Filtering changes by exclude pattern and, optionally, by content
//!   (byte comparison for small files, BLAKE3 digests for large ones).
//!
//! It does **not** know about the supervised process; it only decides
//! whether a change is worth acting on.

pub mod cache;
pub mod diff;
pub mod filter;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod targets;
pub mod watcher;

pub use cache::{CacheEntry, ContentCache};
pub use filter::{ChangeFilter, Verdict, LARGE_FILE_THRESHOLD};
pub use patterns::PatternSet;
pub use targets::resolve_targets;
pub use watcher::{is_relevant, WatchSubscription};

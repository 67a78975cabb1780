// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, RewatchError};

/// An ordered list of compiled glob patterns.
///
/// Patterns are matched against paths relative to the watch root, with
/// forward slashes (e.g. `"cmd/server/main.go"`). As with shell-less globs,
/// `*` also matches across `/`, so `*.go` selects Go files at any depth.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternSet").field(&self.patterns).finish()
    }
}

impl PatternSet {
    /// Compile `patterns` in order. The first malformed pattern aborts with a
    /// [`RewatchError::Pattern`] naming it.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let glob = Glob::new(pat).map_err(|source| RewatchError::Pattern {
                pattern: pat.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| RewatchError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }

    /// The earliest configured pattern that matches `rel_path`, if any.
    pub fn first_match(&self, rel_path: &str) -> Option<&str> {
        self.set
            .matches(rel_path)
            .first()
            .map(|&idx| self.patterns[idx].as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pats: &[&str]) -> PatternSet {
        let owned: Vec<String> = pats.iter().map(|s| s.to_string()).collect();
        PatternSet::compile(&owned).unwrap()
    }

    #[test]
    fn star_crosses_directories() {
        let p = set(&["*.go"]);
        assert!(p.is_match("a.go"));
        assert!(p.is_match("cmd/server/main.go"));
        assert!(!p.is_match("a.rs"));
    }

    #[test]
    fn first_match_reports_configured_order() {
        let p = set(&["vendor/**", "*.go"]);
        assert_eq!(p.first_match("vendor/x/y.go"), Some("vendor/**"));
        assert_eq!(p.first_match("main.go"), Some("*.go"));
        assert_eq!(p.first_match("README.md"), None);
    }

    #[test]
    fn malformed_pattern_is_named_in_error() {
        let err = PatternSet::compile(&["ok/*".to_string(), "bad[".to_string()]).unwrap_err();
        match err {
            RewatchError::Pattern { pattern, .. } => assert_eq!(pattern, "bad["),
            other => panic!("expected pattern error, got {other:?}"),
        }
    }

    #[test]
    fn empty_set_matches_nothing() {
        let p = PatternSet::empty();
        assert!(p.is_empty());
        assert!(!p.is_match("anything"));
    }
}

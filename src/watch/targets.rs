// src/watch/targets.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{trace, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::PatternSet;

/// Walk `root` once, depth-first in name order, and return the paths
/// (relative to `root`) to subscribe to.
///
/// The root itself is judged first, as `"."`; a pattern such as `*` selects
/// it, so files created directly under the root are noticed too.
///
/// Exclusion is checked first and wins: an excluded path is never added, even
/// if an include pattern also matches it. Directories are still descended
/// into regardless, so their children get judged on their own. Directories
/// themselves may become targets when an include pattern matches them.
///
/// An unreadable `root` is an error; unreadable subdirectories are logged and
/// skipped.
pub fn resolve_targets(
    fs: &dyn FileSystem,
    root: &Path,
    includes: &PatternSet,
    excludes: &PatternSet,
) -> Result<Vec<PathBuf>> {
    let mut targets = Vec::new();
    consider(ROOT, includes, excludes, &mut targets);

    let mut top = fs
        .read_dir(root)
        .with_context(|| format!("reading working directory {:?}", root))?;
    top.sort();
    let mut stack: Vec<PathBuf> = top.into_iter().rev().collect();

    while let Some(path) = stack.pop() {
        let Some(rel) = relative_str(root, &path) else {
            continue;
        };

        consider(&rel, includes, excludes, &mut targets);

        if fs.is_dir(&path) {
            match fs.read_dir(&path) {
                Ok(mut children) => {
                    children.sort();
                    stack.extend(children.into_iter().rev());
                }
                Err(err) => warn!(path = %rel, error = %err, "skipping unreadable directory"),
            }
        }
    }

    Ok(targets)
}

/// Root-relative name of the root directory.
const ROOT: &str = ".";

fn consider(rel: &str, includes: &PatternSet, excludes: &PatternSet, targets: &mut Vec<PathBuf>) {
    if let Some(pattern) = excludes.first_match(rel) {
        trace!(path = %rel, pattern, "excluded from targets");
    } else if includes.is_match(rel) {
        targets.push(PathBuf::from(rel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn pats(p: &[&str]) -> PatternSet {
        let owned: Vec<String> = p.iter().map(|s| s.to_string()).collect();
        PatternSet::compile(&owned).unwrap()
    }

    fn names(paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn project() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("./main.go", b"package main");
        fs.add_file("./pkg/util.go", b"package pkg");
        fs.add_file("./pkg/util_test.go", b"package pkg");
        fs.add_file("./README.md", b"# readme");
        fs.add_file("./vendor/dep/dep.go", b"package dep");
        fs
    }

    #[test]
    fn includes_are_collected_depth_first_in_name_order() {
        let fs = project();
        let targets =
            resolve_targets(&fs, Path::new("."), &pats(&["*.go"]), &PatternSet::empty()).unwrap();

        assert_eq!(
            names(targets),
            vec![
                "main.go",
                "pkg/util.go",
                "pkg/util_test.go",
                "vendor/dep/dep.go",
            ]
        );
    }

    #[test]
    fn exclude_wins_over_include() {
        let fs = project();
        let targets = resolve_targets(
            &fs,
            Path::new("."),
            &pats(&["*.go"]),
            &pats(&["*_test.go", "vendor/**"]),
        )
        .unwrap();

        assert_eq!(names(targets), vec!["main.go", "pkg/util.go"]);
    }

    #[test]
    fn matching_directories_become_targets() {
        let fs = project();
        let targets =
            resolve_targets(&fs, Path::new("."), &pats(&["pkg"]), &PatternSet::empty()).unwrap();
        assert_eq!(names(targets), vec!["pkg"]);
    }

    #[test]
    fn root_is_a_candidate_before_its_children() {
        let fs = MockFileSystem::new();
        fs.add_file("./main.go", b"package main");
        fs.add_file("./pkg/util.go", b"package pkg");

        let targets =
            resolve_targets(&fs, Path::new("."), &pats(&["*"]), &PatternSet::empty()).unwrap();
        assert_eq!(names(targets), vec![".", "main.go", "pkg", "pkg/util.go"]);
    }

    #[test]
    fn root_can_be_excluded() {
        let fs = project();
        let targets =
            resolve_targets(&fs, Path::new("."), &pats(&["*"]), &pats(&["."])).unwrap();
        let names = names(targets);
        assert!(!names.contains(&".".to_string()));
        assert!(names.contains(&"main.go".to_string()));
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let fs = MockFileSystem::new();
        let res = resolve_targets(&fs, Path::new("./missing"), &pats(&["*"]), &PatternSet::empty());
        assert!(res.is_err());
    }

    #[test]
    fn no_includes_means_no_targets() {
        let fs = project();
        let targets =
            resolve_targets(&fs, Path::new("."), &PatternSet::empty(), &PatternSet::empty())
                .unwrap();
        assert!(targets.is_empty());
    }
}

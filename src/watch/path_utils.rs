// src/watch/path_utils.rs

use std::path::Path;

/// `path` relative to `root`, with forward slashes; `"."` for the root itself.
///
/// Watcher events carry paths built from the canonicalised root, so the plain
/// prefix strip almost always succeeds. Paths that reach the root through a
/// symlink are resolved before giving up.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            let root = root.canonicalize().ok()?;
            path.canonicalize().ok()?.strip_prefix(&root).ok()?.to_path_buf()
        }
    };

    if rel.as_os_str().is_empty() {
        return Some(".".to_string());
    }
    Some(rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn strips_root_and_normalises_separators() {
        let root = PathBuf::from("/work/project");
        let path = root.join("cmd").join("main.go");
        assert_eq!(relative_str(&root, &path).as_deref(), Some("cmd/main.go"));
    }

    #[test]
    fn root_itself_is_dot() {
        let root = PathBuf::from("/work/project");
        assert_eq!(relative_str(&root, &root).as_deref(), Some("."));
    }

    #[test]
    fn unrelated_paths_are_rejected() {
        let root = PathBuf::from("/work/project-that-does-not-exist");
        assert_eq!(relative_str(&root, Path::new("/elsewhere/x.go")), None);
    }
}

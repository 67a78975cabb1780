// src/watch/diff.rs

//! Human-readable diffs for debug output.

use similar::TextDiff;

/// Lines of context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Unified diff between two versions of a file, cut to at most `max_lines`
/// lines. Non-UTF-8 content is rendered lossily.
pub fn unified_diff(old: &[u8], new: &[u8], max_lines: usize) -> String {
    let old = String::from_utf8_lossy(old);
    let new = String::from_utf8_lossy(new);

    let diff = TextDiff::from_lines(&*old, &*new);
    let rendered = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header("before", "after")
        .to_string();

    rendered
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;

/// A live subscription to filesystem change notifications.
///
/// Paths are registered one by one (non-recursively), relative to `root`.
/// Events and watcher errors arrive on a single channel fed from notify's
/// callback thread. Dropping the subscription stops watching and closes that
/// channel.
pub struct WatchSubscription {
    root: PathBuf,
    watcher: RecommendedWatcher,
    /// Same channel notify's callback feeds.
    event_tx: mpsc::UnboundedSender<notify::Result<Event>>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl std::fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSubscription")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatchSubscription {
    /// Create a subscription with nothing registered yet.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        // Channel from the blocking notify callback into the async world.
        let (event_tx, events) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let callback_tx = event_tx.clone();
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Err(err) = callback_tx.send(res) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("rewatch: failed to forward notify event: {err}");
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            root,
            watcher,
            event_tx,
            events,
        })
    }

    /// A sender into this subscription's event stream, for feeding it events
    /// (or errors) that did not come from notify.
    pub fn injector(&self) -> mpsc::UnboundedSender<notify::Result<Event>> {
        self.event_tx.clone()
    }

    /// Start watching `rel_path` (relative to the root).
    pub fn register(&mut self, rel_path: &Path) -> Result<()> {
        let abs = self.root.join(rel_path);
        self.watcher.watch(&abs, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    /// Register every target, logging (and skipping) those that fail.
    /// Returns how many were registered.
    pub fn register_all(&mut self, targets: &[PathBuf]) -> usize {
        let mut registered = 0;
        for target in targets {
            match self.register(target) {
                Ok(()) => registered += 1,
                Err(err) => warn!(path = ?target, error = %err, "failed to watch target"),
            }
        }
        info!(registered, total = targets.len(), "file watcher started on {:?}", self.root);
        registered
    }

    /// Drop and re-add the watch for `rel_path`.
    ///
    /// Editors that save by replacing the file leave the old watch pointing at
    /// a dead inode; re-registering picks up the new one.
    pub fn rewatch(&mut self, rel_path: &Path) {
        let abs = self.root.join(rel_path);
        if let Err(err) = self.watcher.unwatch(&abs) {
            debug!(path = ?rel_path, error = %err, "unwatch before re-register failed");
        }
        match self.watcher.watch(&abs, RecursiveMode::NonRecursive) {
            Ok(()) => debug!(path = ?rel_path, "re-registered watch"),
            Err(err) => warn!(path = ?rel_path, error = %err, "failed to re-register watch"),
        }
    }

    /// Next event or watcher error; `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<notify::Result<Event>> {
        self.events.recv().await
    }
}

/// Whether an event kind can signal a content or structure change.
///
/// Pure access notifications (open, read, close) never do.
pub fn is_relevant(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    use super::*;

    #[test]
    fn access_events_are_not_relevant() {
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Remove(notify::event::RemoveKind::Any)));
    }

    #[tokio::test]
    async fn registering_a_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sub = WatchSubscription::new(dir.path()).unwrap();
        assert!(sub.register(Path::new("does-not-exist")).is_err());
        assert_eq!(sub.register_all(&[PathBuf::from("does-not-exist")]), 0);
    }
}

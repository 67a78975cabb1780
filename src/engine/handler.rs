// src/engine/handler.rs

//! The debounced change action.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::exec::Supervisor;
use crate::watch::{ChangeFilter, ContentCache, Verdict};

use super::debouncer::DebouncedAction;
use super::ActionOutcome;

/// One reported change, as handed to the debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeJob {
    /// Path as reported by the watcher.
    pub path: PathBuf,
    /// Same path relative to the watch root, with forward slashes.
    pub rel: String,
}

/// Runs once per quiet period: filters the newest change again, verifies its
/// content if enabled, then restarts the process or, in exit-on-change mode,
/// stops it and asks the driver to finish.
///
/// Owns the content cache; the debouncer's single driver task is the only
/// place it is read or written.
pub struct ChangeHandler<S> {
    filter: ChangeFilter,
    cache: ContentCache,
    supervisor: Arc<Mutex<S>>,
    graceful_timeout: Duration,
    exit_on_change: bool,
    rewatch_tx: mpsc::UnboundedSender<PathBuf>,
}

impl<S> std::fmt::Debug for ChangeHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeHandler")
            .field("cached_files", &self.cache.len())
            .field("exit_on_change", &self.exit_on_change)
            .finish_non_exhaustive()
    }
}

impl<S: Supervisor + 'static> ChangeHandler<S> {
    /// `rewatch_tx` receives the root-relative path of every change that led
    /// to a restart, so its owner can re-register the watch.
    pub fn new(
        filter: ChangeFilter,
        supervisor: Arc<Mutex<S>>,
        graceful_timeout: Duration,
        exit_on_change: bool,
        rewatch_tx: mpsc::UnboundedSender<PathBuf>,
    ) -> Self {
        Self {
            filter,
            cache: ContentCache::new(),
            supervisor,
            graceful_timeout,
            exit_on_change,
            rewatch_tx,
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Run the action for one change.
    pub async fn handle(&mut self, job: ChangeJob) -> ActionOutcome {
        match self.filter.check(&job.path, &job.rel, &self.cache) {
            Verdict::Excluded { pattern } => {
                info!(path = %job.rel, %pattern, "ignore; matches exclude pattern");
                return ActionOutcome::Continue;
            }
            Verdict::Unchanged => {
                info!(path = %job.rel, "skip; content not changed");
                return ActionOutcome::Continue;
            }
            Verdict::Act { update } => {
                if let Some(entry) = update {
                    self.cache.commit(&job.path, entry);
                }
            }
        }

        let mut supervisor = self.supervisor.lock().await;

        if self.exit_on_change {
            info!(path = %job.rel, "change detected; stopping process");
            return match supervisor.exit(self.graceful_timeout).await {
                Ok(()) => ActionOutcome::Stop,
                Err(err) => ActionOutcome::Failed(err),
            };
        }

        info!(path = %job.rel, "restart process");
        if let Err(err) = supervisor.restart(self.graceful_timeout).await {
            return ActionOutcome::Failed(err);
        }
        drop(supervisor);
        debug!("process restarted");

        if self.rewatch_tx.send(PathBuf::from(&job.rel)).is_err() {
            debug!(path = %job.rel, "rewatch receiver gone; skipping re-registration");
        }
        ActionOutcome::Continue
    }
}

impl<S: Supervisor + 'static> DebouncedAction for ChangeHandler<S> {
    type Job = ChangeJob;

    fn run(&mut self, job: ChangeJob) -> Pin<Box<dyn Future<Output = ActionOutcome> + Send + '_>> {
        Box::pin(self.handle(job))
    }
}

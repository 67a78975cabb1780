// src/engine/runtime.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::Event;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::errors::{Result, RewatchError};
use crate::exec::Supervisor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::path_utils::relative_str;
use crate::watch::{is_relevant, resolve_targets, ChangeFilter, WatchSubscription};

use super::debouncer::Debouncer;
use super::handler::{ChangeHandler, ChangeJob};
use super::{DebounceSignal, Shutdown};

/// Top-level event loop.
///
/// Resolves targets, starts the supervised process, subscribes to changes
/// and then waits on whichever comes first: a change event, a watcher error,
/// a report from the debounced action, or cancellation.
///
/// The runtime owns the watch subscription and the cancellation token. The
/// supervisor is shared with the change action for the length of the run.
pub struct Runtime<S: Supervisor + 'static> {
    config: Config,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    supervisor: Arc<Mutex<S>>,
    cancel: CancellationToken,
}

impl<S: Supervisor + 'static> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<S: Supervisor + 'static> Runtime<S> {
    pub fn new(
        config: Config,
        root: impl Into<PathBuf>,
        supervisor: S,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            root: root.into(),
            fs: Arc::new(RealFileSystem),
            supervisor: Arc::new(Mutex::new(supervisor)),
            cancel,
        }
    }

    /// Shared handle to the supervisor, e.g. for inspection after `run`.
    pub fn supervisor(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.supervisor)
    }

    /// Main event loop.
    ///
    /// Startup failures (unreadable root, spawn failure) are returned before
    /// anything is watched. Whatever the outcome, the child is force-killed
    /// if it is still running when the loop ends.
    pub async fn run(self) -> Result<Shutdown> {
        // Canonicalize once so event paths and targets share a stable base.
        let root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());

        info!("wait on exit: {:?}", self.config.graceful_timeout());
        info!("debounce: {:?}", self.config.debounce());
        if self.config.dry_run() {
            warn!("dry run");
        }

        let targets = resolve_targets(
            self.fs.as_ref(),
            &root,
            self.config.includes(),
            self.config.excludes(),
        )?;
        info!(
            "targets: \n{}",
            targets
                .iter()
                .map(|t| t.to_string_lossy())
                .collect::<Vec<_>>()
                .join("\n")
        );

        self.supervisor.lock().await.start().await?;

        let outcome = self.supervise(&root, &targets).await;

        if let Err(err) = self.supervisor.lock().await.kill().await {
            warn!(error = %err, "failed to kill process during shutdown");
        }

        match &outcome {
            Ok(shutdown) => info!(?shutdown, "runtime exiting"),
            Err(err) => warn!(error = %err, "runtime exiting with error"),
        }
        outcome
    }

    async fn supervise(&self, root: &Path, targets: &[PathBuf]) -> Result<Shutdown> {
        let mut watch = WatchSubscription::new(root)?;
        watch.register_all(targets);
        self.event_loop(root, watch).await
    }

    /// Drive `watch` until cancellation, a stop or failure reported by the
    /// debouncer, or a watcher error.
    async fn event_loop(&self, root: &Path, mut watch: WatchSubscription) -> Result<Shutdown> {
        let filter = ChangeFilter::from_config(&self.config, Arc::clone(&self.fs));
        let (rewatch_tx, mut rewatch_rx) = mpsc::unbounded_channel::<PathBuf>();
        let handler = ChangeHandler::new(
            filter.clone(),
            Arc::clone(&self.supervisor),
            self.config.graceful_timeout(),
            self.config.exit_on_change(),
            rewatch_tx,
        );
        let mut debouncer = Debouncer::spawn(self.config.debounce(), handler);

        let result = loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    info!("context done: cancelled");
                    break Ok(Shutdown::Cancelled);
                }

                signal = debouncer.errors().recv() => match signal {
                    Some(DebounceSignal::Stopped) => break Ok(Shutdown::ExitOnChange),
                    Some(DebounceSignal::Failed(RewatchError::Cancelled))
                        if self.cancel.is_cancelled() =>
                    {
                        break Ok(Shutdown::Cancelled);
                    }
                    Some(DebounceSignal::Failed(err)) => {
                        warn!(error = %err, "change action failed");
                        break Err(err);
                    }
                    None => {
                        break Err(RewatchError::Other(anyhow::anyhow!(
                            "debouncer stopped unexpectedly"
                        )));
                    }
                },

                Some(rel) = rewatch_rx.recv() => watch.rewatch(&rel),

                event = watch.recv() => match event {
                    Some(Ok(event)) => self.on_event(root, &filter, &debouncer, event),
                    Some(Err(err)) => {
                        warn!(error = %err, "watcher error");
                        break Err(RewatchError::Watch(err));
                    }
                    None => {
                        debug!("event chan closed");
                        break Ok(Shutdown::WatcherClosed);
                    }
                },
            }
        };

        debouncer.shutdown().await;
        drop(watch);
        result
    }

    /// Route one notify event: relevant, non-excluded paths are handed to the
    /// debouncer.
    fn on_event(
        &self,
        root: &Path,
        filter: &ChangeFilter,
        debouncer: &Debouncer<ChangeJob>,
        event: Event,
    ) {
        if !is_relevant(&event.kind) {
            trace!(kind = ?event.kind, "ignoring access event");
            return;
        }

        for path in event.paths {
            let Some(rel) = relative_str(root, &path) else {
                warn!("could not relativize path {:?} against root {:?}", path, root);
                continue;
            };
            info!(path = %rel, kind = ?event.kind, "modified file");

            if let Some(pattern) = filter.excluded_by(&rel) {
                info!(path = %rel, pattern, "ignore; matches exclude pattern");
                continue;
            }

            debouncer.call(ChangeJob { path, rel });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::RawConfig;
    use crate::exec::SupervisorFuture;

    use super::*;

    /// Supervisor that does nothing.
    #[derive(Debug, Default)]
    struct Idle;

    impl Supervisor for Idle {
        fn start(&mut self) -> SupervisorFuture<'_> {
            Box::pin(async { Ok(()) })
        }

        fn exit(&mut self, _: Duration) -> SupervisorFuture<'_> {
            Box::pin(async { Ok(()) })
        }

        fn restart(&mut self, _: Duration) -> SupervisorFuture<'_> {
            Box::pin(async { Ok(()) })
        }

        fn kill(&mut self) -> SupervisorFuture<'_> {
            Box::pin(async { Ok(()) })
        }
    }

    fn runtime(root: &Path, cancel: CancellationToken) -> Runtime<Idle> {
        let raw = RawConfig {
            command: vec!["true".to_string()],
            includes: vec!["*.go".to_string()],
            ..RawConfig::default()
        };
        Runtime::new(Config::try_from(raw).unwrap(), root, Idle::default(), cancel)
    }

    #[tokio::test]
    async fn watcher_error_ends_loop_with_that_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let rt = runtime(&root, CancellationToken::new());

        let watch = WatchSubscription::new(&root).unwrap();
        watch
            .injector()
            .send(Err(notify::Error::generic("event queue overflowed")))
            .unwrap();

        let res = tokio::time::timeout(Duration::from_secs(5), rt.event_loop(&root, watch))
            .await
            .expect("loop did not end");
        assert!(matches!(res, Err(RewatchError::Watch(_))), "got {res:?}");
    }

    #[tokio::test]
    async fn cancellation_wins_over_pending_events() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cancel = CancellationToken::new();
        let rt = runtime(&root, cancel.clone());

        let watch = WatchSubscription::new(&root).unwrap();
        watch
            .injector()
            .send(Err(notify::Error::generic("late error")))
            .unwrap();
        cancel.cancel();

        let res = rt.event_loop(&root, watch).await;
        assert!(matches!(res, Ok(Shutdown::Cancelled)), "got {res:?}");
    }
}

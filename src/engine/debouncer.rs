// src/engine/debouncer.rs

//! Trailing-edge debouncer with last-call-wins semantics.
//!
//! `Idle --call--> Pending --window elapsed--> Executing --done--> Idle`
//!
//! A `call` in `Pending` or `Executing` replaces the pending job and pushes
//! the deadline to a full window from now. Only the newest job of a burst
//! runs; earlier ones are discarded, not queued. A single driver task runs
//! the jobs, so two actions never overlap.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use super::{ActionOutcome, DebounceSignal};

/// The work a [`Debouncer`] runs once a window elapses.
///
/// The action is owned by the driver task, so any state it keeps (such as
/// the content cache) is only ever touched from that one task.
pub trait DebouncedAction: Send + 'static {
    type Job: Send + 'static;

    fn run(&mut self, job: Self::Job) -> Pin<Box<dyn Future<Output = ActionOutcome> + Send + '_>>;
}

struct Pending<J> {
    job: J,
    deadline: Instant,
}

/// Pending-action slot shared between callers and the driver.
type Slot<J> = Arc<Mutex<Option<Pending<J>>>>;

fn lock<J>(slot: &Slot<J>) -> MutexGuard<'_, Option<Pending<J>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Debouncer<J> {
    window: Duration,
    slot: Slot<J>,
    wake: Arc<Notify>,
    signals: mpsc::UnboundedReceiver<DebounceSignal>,
    driver: JoinHandle<()>,
}

impl<J> std::fmt::Debug for Debouncer<J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<J: Send + 'static> Debouncer<J> {
    /// Spawn the driver task for `action` on the current Tokio runtime.
    pub fn spawn<A>(window: Duration, action: A) -> Self
    where
        A: DebouncedAction<Job = J>,
    {
        debug!(?window, "debouncer started");
        let slot: Slot<J> = Arc::new(Mutex::new(None));
        let wake = Arc::new(Notify::new());
        let (tx, signals) = mpsc::unbounded_channel();

        let driver = tokio::spawn(drive(action, Arc::clone(&slot), Arc::clone(&wake), tx));

        Self {
            window,
            slot,
            wake,
            signals,
            driver,
        }
    }

    /// Schedule `job` to run once `window` passes with no further calls.
    ///
    /// Only touches the pending slot, so it is safe while an earlier job is
    /// still executing.
    pub fn call(&self, job: J) {
        trace!("debouncer called");
        let deadline = Instant::now() + self.window;
        *lock(&self.slot) = Some(Pending { job, deadline });
        self.wake.notify_one();
    }

    /// Stream of stop / failure reports from executed actions.
    pub fn errors(&mut self) -> &mut mpsc::UnboundedReceiver<DebounceSignal> {
        &mut self.signals
    }

    /// Whether the driver task has ended (after a `Stop`, or once shut down).
    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }

    /// Stop the driver, dropping any pending job and aborting a running one.
    /// Returns once the driver (and everything it owned) is gone.
    pub async fn shutdown(mut self) {
        self.driver.abort();
        let _ = (&mut self.driver).await;
    }
}

impl<J> Drop for Debouncer<J> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<A: DebouncedAction>(
    mut action: A,
    slot: Slot<A::Job>,
    wake: Arc<Notify>,
    tx: mpsc::UnboundedSender<DebounceSignal>,
) {
    loop {
        let deadline = lock(&slot).as_ref().map(|p| p.deadline);
        let Some(deadline) = deadline else {
            wake.notified().await;
            continue;
        };

        tokio::select! {
            _ = sleep_until(deadline) => {}
            // A newer call moved the deadline; re-read it.
            _ = wake.notified() => continue,
        }

        let due = {
            let mut pending = lock(&slot);
            let is_due = pending
                .as_ref()
                .is_some_and(|p| p.deadline <= Instant::now());
            if is_due {
                pending.take().map(|p| p.job)
            } else {
                None
            }
        };
        let Some(job) = due else {
            continue;
        };

        debug!("debounce window elapsed; running action");
        match action.run(job).await {
            ActionOutcome::Continue => {}
            ActionOutcome::Stop => {
                debug!("action requested stop; debouncer finished");
                let _ = tx.send(DebounceSignal::Stopped);
                break;
            }
            ActionOutcome::Failed(err) => {
                if tx.send(DebounceSignal::Failed(err)).is_err() {
                    debug!("debounce signal receiver dropped; debouncer finished");
                    break;
                }
            }
        }
    }
}

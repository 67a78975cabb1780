// src/engine/mod.rs

//! Orchestration engine for rewatch.
//!
//! This module ties together:
//! - the [`debouncer`], which coalesces bursts of changes into one deferred
//!   action and runs at most one action at a time
//! - the [`handler`], the action itself: re-filter, verify content, then
//!   restart (or stop) the supervised process
//! - the [`runtime`] event loop that reacts to:
//!   - file-watch events and watcher errors
//!   - outcomes reported by the debouncer
//!   - process-wide cancellation (SIGINT / SIGTERM)

use std::fmt;

use crate::errors::RewatchError;

/// What a debounced action asks of the driver that ran it.
#[derive(Debug)]
pub enum ActionOutcome {
    /// Keep going; nothing to report.
    Continue,
    /// Deliberate stop: no further actions should run.
    Stop,
    /// The action failed.
    Failed(RewatchError),
}

/// Reported by the debouncer to whoever consumes [`Debouncer::errors`].
#[derive(Debug)]
pub enum DebounceSignal {
    /// An action returned [`ActionOutcome::Stop`]; the driver has finished.
    Stopped,
    /// An action failed. The driver keeps running; the consumer decides.
    Failed(RewatchError),
}

/// Why the runtime loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Exit-on-change fired and the process was stopped.
    ExitOnChange,
    /// SIGINT / SIGTERM (or another holder of the token) cancelled the run.
    Cancelled,
    /// The watcher's event stream closed.
    WatcherClosed,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shutdown::ExitOnChange => write!(f, "change detected; process stopped, exiting"),
            Shutdown::Cancelled => write!(f, "interrupted; shutting down"),
            Shutdown::WatcherClosed => write!(f, "file watcher closed; shutting down"),
        }
    }
}

pub mod debouncer;
pub mod handler;
pub mod runtime;

pub use debouncer::{DebouncedAction, Debouncer};
pub use handler::{ChangeHandler, ChangeJob};
pub use runtime::Runtime;

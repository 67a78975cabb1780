// src/exec/backend.rs

//! Pluggable supervisor abstraction.
//!
//! The change action and the runtime talk to a `Supervisor` instead of a
//! concrete process handle. Production code uses
//! [`ProcessSupervisor`](super::ProcessSupervisor); tests can provide an
//! implementation that only records what was asked of it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;

/// Boxed future returned by every [`Supervisor`] operation.
pub type SupervisorFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Lifecycle control for one logical child process.
///
/// Calls must not overlap; the debouncer guarantees this for `restart` and
/// `exit`, and the runtime only calls `kill` after the debouncer has stopped.
pub trait Supervisor: Send {
    /// Launch the child (or, in dry-run mode, pretend to).
    fn start(&mut self) -> SupervisorFuture<'_>;

    /// Terminate gracefully: signal, wait up to `graceful_timeout`, then
    /// force-kill and reap. A no-op when nothing was started.
    fn exit(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_>;

    /// `exit`, then start a fresh process. If `exit` fails nothing new is
    /// started.
    fn restart(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_>;

    /// Immediate forceful termination, for abrupt shutdown paths.
    fn kill(&mut self) -> SupervisorFuture<'_>;
}

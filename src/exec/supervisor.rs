// src/exec/supervisor.rs

use std::process::Stdio;
use std::time::Duration;

use anyhow::anyhow;
use tokio::process::{Child, Command};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::{Result, RewatchError};
use crate::exec::backend::{Supervisor, SupervisorFuture};
use crate::exec::signal::request_termination;

/// Lifecycle of one process handle.
///
/// `Stopped` is terminal: a restart builds a new handle rather than reviving
/// the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Running,
    Stopping,
    Stopped,
}

/// One incarnation of the supervised command.
#[derive(Debug)]
struct ProcessHandle {
    state: ProcessState,
    /// `None` before start, and for the whole life of a dry-run handle.
    child: Option<Child>,
}

impl ProcessHandle {
    fn new() -> Self {
        Self {
            state: ProcessState::NotStarted,
            child: None,
        }
    }
}

/// Runs the configured command and knows how to stop it.
///
/// The child shares the parent's stdout/stderr, gets no stdin, and is killed
/// if the supervisor is dropped while it is still running.
#[derive(Debug)]
pub struct ProcessSupervisor {
    command: Vec<String>,
    dry_run: bool,
    cancel: CancellationToken,
    handle: ProcessHandle,
    starts: u64,
}

impl ProcessSupervisor {
    pub fn new(command: Vec<String>, dry_run: bool, cancel: CancellationToken) -> Self {
        Self {
            command,
            dry_run,
            cancel,
            handle: ProcessHandle::new(),
            starts: 0,
        }
    }

    pub fn from_config(cfg: &Config, cancel: CancellationToken) -> Self {
        Self::new(cfg.command().to_vec(), cfg.dry_run(), cancel)
    }

    pub fn state(&self) -> ProcessState {
        self.handle.state
    }

    /// Number of successful starts so far (real or simulated).
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// OS pid of the current child, if one is alive and not yet reaped.
    pub fn pid(&self) -> Option<u32> {
        self.handle.child.as_ref().and_then(|c| c.id())
    }

    async fn start_inner(&mut self) -> Result<()> {
        if self.handle.state != ProcessState::NotStarted {
            return Err(RewatchError::Other(anyhow!(
                "process handle already used (state {:?})",
                self.handle.state
            )));
        }
        if self.cancel.is_cancelled() {
            return Err(RewatchError::Cancelled);
        }

        if self.dry_run {
            warn!(command = ?self.command, "dry run; not starting process");
            self.handle.state = ProcessState::Running;
            self.starts += 1;
            return Ok(());
        }

        let Some((program, args)) = self.command.split_first() else {
            return Err(RewatchError::ConfigError("empty command".to_string()));
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                error!(program = %program, error = %source, "failed to start process");
                RewatchError::Spawn {
                    program: program.clone(),
                    source,
                }
            })?;

        info!(pid = ?child.id(), command = ?self.command, "process started");
        self.handle.child = Some(child);
        self.handle.state = ProcessState::Running;
        self.starts += 1;
        Ok(())
    }

    async fn exit_inner(&mut self, graceful_timeout: Duration) -> Result<()> {
        let Some(child) = self.handle.child.as_mut() else {
            if self.handle.state == ProcessState::Running {
                // Dry-run handle: nothing to signal.
                self.handle.state = ProcessState::Stopped;
            }
            debug!("process not started");
            return Ok(());
        };

        if self.handle.state == ProcessState::Stopped {
            return Ok(());
        }
        self.handle.state = ProcessState::Stopping;

        if let Err(err) = request_termination(child) {
            warn!(error = %err, "failed to send termination signal");
        }
        // The graceful window starts once the signal has been sent.
        let deadline = Instant::now() + graceful_timeout;

        tokio::select! {
            status = child.wait() => {
                match status {
                    Ok(status) => info!(%status, "process exited"),
                    Err(err) => warn!(error = %err, "failed to wait for process"),
                }
            }
            _ = sleep_until(deadline) => {
                warn!(timeout = ?graceful_timeout, "process did not exit in time; killing");
                if let Err(err) = child.start_kill() {
                    warn!(error = %err, "failed to kill process");
                }
                match child.wait().await {
                    Ok(status) => info!(%status, "killed process reaped"),
                    Err(err) => warn!(error = %err, "failed to reap killed process"),
                }
            }
            _ = self.cancel.cancelled() => {
                warn!("cancelled while waiting for process to exit; it may still be running");
                return Err(RewatchError::Cancelled);
            }
        }

        self.handle.state = ProcessState::Stopped;
        Ok(())
    }

    async fn restart_inner(&mut self, graceful_timeout: Duration) -> Result<()> {
        if let Err(err) = self.exit_inner(graceful_timeout).await {
            error!(error = %err, "failed to stop process; not restarting");
            return Err(err);
        }
        debug!("exited");

        self.handle = ProcessHandle::new();
        self.start_inner().await
    }

    async fn kill_inner(&mut self) -> Result<()> {
        if !matches!(
            self.handle.state,
            ProcessState::Running | ProcessState::Stopping
        ) {
            return Ok(());
        }
        if let Some(child) = self.handle.child.as_mut() {
            info!(pid = ?child.id(), "killing process");
            if let Err(err) = child.kill().await {
                warn!(error = %err, "failed to kill process");
            }
        }
        self.handle.state = ProcessState::Stopped;
        Ok(())
    }
}

impl Supervisor for ProcessSupervisor {
    fn start(&mut self) -> SupervisorFuture<'_> {
        Box::pin(self.start_inner())
    }

    fn exit(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_> {
        Box::pin(self.exit_inner(graceful_timeout))
    }

    fn restart(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_> {
        Box::pin(self.restart_inner(graceful_timeout))
    }

    fn kill(&mut self) -> SupervisorFuture<'_> {
        Box::pin(self.kill_inner())
    }
}

// src/exec/signal.rs

//! Polite termination requests for child processes.

use std::io;

use tokio::process::Child;

/// Ask `child` to shut down (SIGTERM on Unix).
///
/// A child that has already been reaped is left alone. Platforms without
/// signals fall back to a forceful kill.
#[cfg(unix)]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return Ok(());
    };
    kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(io::Error::from)
}

#[cfg(not(unix))]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the supervised child process, using
//! `tokio::process::Command` with inherited stdout/stderr.
//!
//! - [`backend`] provides the `Supervisor` trait the engine is written
//!   against.
//! - [`supervisor`] is the real implementation: start, graceful exit with
//!   escalation to kill, restart.
//! - [`signal`] sends the polite termination request.

pub mod backend;
pub mod signal;
pub mod supervisor;

pub use backend::{Supervisor, SupervisorFuture};
pub use supervisor::{ProcessState, ProcessSupervisor};

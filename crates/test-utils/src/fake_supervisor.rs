use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rewatch::errors::RewatchError;
use rewatch::exec::{Supervisor, SupervisorFuture};

/// One call made against a [`FakeSupervisor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorCall {
    Start,
    Exit(Duration),
    Restart(Duration),
    Kill,
}

/// A fake supervisor that:
/// - records every call in order (clones share the record)
/// - never spawns anything
/// - can be told to fail `start` or `restart`.
#[derive(Debug, Clone, Default)]
pub struct FakeSupervisor {
    calls: Arc<Mutex<Vec<SupervisorCall>>>,
    fail_start: bool,
    fail_restart: bool,
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_restart(mut self) -> Self {
        self.fail_restart = true;
        self
    }

    pub fn calls(&self) -> Vec<SupervisorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn restarts(&self) -> usize {
        self.count(|c| matches!(c, SupervisorCall::Restart(_)))
    }

    pub fn exits(&self) -> usize {
        self.count(|c| matches!(c, SupervisorCall::Exit(_)))
    }

    pub fn starts(&self) -> usize {
        self.count(|c| matches!(c, SupervisorCall::Start))
    }

    fn count(&self, pred: impl Fn(&SupervisorCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: SupervisorCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn spawn_failure() -> RewatchError {
    RewatchError::Spawn {
        program: "fake".to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "fake spawn failure"),
    }
}

impl Supervisor for FakeSupervisor {
    fn start(&mut self) -> SupervisorFuture<'_> {
        self.record(SupervisorCall::Start);
        let fail = self.fail_start;
        Box::pin(async move { if fail { Err(spawn_failure()) } else { Ok(()) } })
    }

    fn exit(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_> {
        self.record(SupervisorCall::Exit(graceful_timeout));
        Box::pin(async { Ok(()) })
    }

    fn restart(&mut self, graceful_timeout: Duration) -> SupervisorFuture<'_> {
        self.record(SupervisorCall::Restart(graceful_timeout));
        let fail = self.fail_restart;
        Box::pin(async move { if fail { Err(spawn_failure()) } else { Ok(()) } })
    }

    fn kill(&mut self) -> SupervisorFuture<'_> {
        self.record(SupervisorCall::Kill);
        Box::pin(async { Ok(()) })
    }
}

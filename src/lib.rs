// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::{Config, RawConfig};
use crate::engine::{Runtime, Shutdown};
use crate::errors::Result;
use crate::exec::ProcessSupervisor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config validation
/// - SIGINT / SIGTERM handling
/// - the process supervisor
/// - the runtime (target resolution, watcher, debouncer)
pub async fn run(args: CliArgs) -> Result<Shutdown> {
    let config = Config::try_from(RawConfig::from(&args))?;
    let root = std::env::current_dir()?;

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let supervisor = ProcessSupervisor::from_config(&config, cancel.clone());
    Runtime::new(config, root, supervisor, cancel).run().await
}

/// Cancel `token` on the first SIGINT (Ctrl-C) or SIGTERM.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    warn!("failed to listen for SIGTERM: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => debug!("received Ctrl+C"),
            () = terminate => debug!("received SIGTERM"),
        }
        token.cancel();
    });
}

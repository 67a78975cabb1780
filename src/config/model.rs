// src/config/model.rs

use std::time::Duration;

use crate::cli::CliArgs;
use crate::watch::PatternSet;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_GRACEFUL_TIMEOUT: Duration = Duration::from_secs(1);
/// Upper bound for `debounce` and `graceful_timeout`; deadlines are computed
/// as `now + duration` and must stay representable.
pub const MAX_DURATION: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Unvalidated configuration, as collected from the command line.
///
/// Turn it into a [`Config`] with `Config::try_from(raw)`, which rejects an
/// empty command and compiles every glob.
#[derive(Debug, Clone)]
pub struct RawConfig {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub command: Vec<String>,
    pub debounce: Duration,
    pub graceful_timeout: Duration,
    pub dry_run: bool,
    pub exit_on_change: bool,
    pub content_check: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            command: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
            graceful_timeout: DEFAULT_GRACEFUL_TIMEOUT,
            dry_run: false,
            exit_on_change: false,
            content_check: false,
        }
    }
}

impl From<&CliArgs> for RawConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            includes: args.includes.clone(),
            excludes: args.excludes.clone(),
            command: args.command.clone(),
            debounce: args.debounce,
            graceful_timeout: args.graceful_timeout,
            dry_run: args.dry_run,
            exit_on_change: args.exit_on_change,
            content_check: args.content_check,
        }
    }
}

/// Validated configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct Config {
    includes: PatternSet,
    excludes: PatternSet,
    command: Vec<String>,
    debounce: Duration,
    graceful_timeout: Duration,
    dry_run: bool,
    exit_on_change: bool,
    content_check: bool,
}

impl Config {
    /// Only reachable through validation; see `config::validate`.
    pub(crate) fn new_unchecked(raw: RawConfig, includes: PatternSet, excludes: PatternSet) -> Self {
        Self {
            includes,
            excludes,
            command: raw.command,
            debounce: raw.debounce,
            graceful_timeout: raw.graceful_timeout,
            dry_run: raw.dry_run,
            exit_on_change: raw.exit_on_change,
            content_check: raw.content_check,
        }
    }

    pub fn includes(&self) -> &PatternSet {
        &self.includes
    }

    pub fn excludes(&self) -> &PatternSet {
        &self.excludes
    }

    /// Program and arguments; never empty.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn graceful_timeout(&self) -> Duration {
        self.graceful_timeout
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn exit_on_change(&self) -> bool {
        self.exit_on_change
    }

    pub fn content_check(&self) -> bool {
        self.content_check
    }
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::duration::parse_duration;

/// Command-line arguments for `rewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rewatch",
    version,
    about = "Run a command and restart it when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Log the command instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Glob pattern selecting paths to watch (repeatable).
    #[arg(short = 'i', long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Glob pattern for paths to ignore; wins over `--include` (repeatable).
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Quiet period after the last change before acting (e.g. `100ms`, `2s`).
    #[arg(long, value_name = "DURATION", default_value = "100ms", value_parser = parse_duration)]
    pub debounce: Duration,

    /// How long to wait after SIGTERM before killing the command.
    #[arg(long, value_name = "DURATION", default_value = "1s", value_parser = parse_duration)]
    pub graceful_timeout: Duration,

    /// Stop the command and exit on the first change instead of restarting.
    #[arg(short = 'x', long)]
    pub exit_on_change: bool,

    /// Only act when file content actually changed.
    #[arg(short = 'c', long)]
    pub content_check: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `-v` flags, `REWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Raise verbosity (`-v` debug, `-vv` trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Command to supervise, followed by its arguments.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log output format; `text` colours only when stderr is a terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    /// Text with ANSI colours forced on.
    TextColor,
    Json,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = CliArgs::try_parse_from(["rewatch", "-i", "*.go", "go", "run", "."]).unwrap();
        assert_eq!(args.debounce, Duration::from_millis(100));
        assert_eq!(args.graceful_timeout, Duration::from_secs(1));
        assert_eq!(args.includes, vec!["*.go".to_string()]);
        assert_eq!(args.command, vec!["go", "run", "."]);
        assert!(!args.exit_on_change);
        assert!(!args.content_check);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn command_arguments_may_look_like_flags() {
        let args =
            CliArgs::try_parse_from(["rewatch", "-x", "--", "cargo", "run", "--release"]).unwrap();
        assert!(args.exit_on_change);
        assert_eq!(args.command, vec!["cargo", "run", "--release"]);
    }

    #[test]
    fn log_format_accepts_forced_colour() {
        let args =
            CliArgs::try_parse_from(["rewatch", "--log-format", "text-color", "true"]).unwrap();
        assert_eq!(args.log_format, LogFormat::TextColor);
        assert!(CliArgs::try_parse_from(["rewatch", "--log-format", "fancy", "true"]).is_err());
    }

    #[test]
    fn rejects_bad_duration() {
        let res = CliArgs::try_parse_from(["rewatch", "--debounce", "soon", "true"]);
        assert!(res.is_err());
    }
}

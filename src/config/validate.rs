// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{Config, RawConfig, MAX_DURATION};
use crate::errors::{Result, RewatchError};
use crate::watch::PatternSet;

impl TryFrom<RawConfig> for Config {
    type Error = RewatchError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        ensure_has_command(&raw)?;
        ensure_bounded("debounce", raw.debounce)?;
        ensure_bounded("graceful timeout", raw.graceful_timeout)?;
        let includes = PatternSet::compile(&raw.includes)?;
        let excludes = PatternSet::compile(&raw.excludes)?;
        Ok(Config::new_unchecked(raw, includes, excludes))
    }
}

fn ensure_has_command(raw: &RawConfig) -> Result<()> {
    match raw.command.first() {
        None => Err(RewatchError::ConfigError(
            "a command to run is required (e.g. `rewatch -i '*.go' -- go run .`)".to_string(),
        )),
        Some(program) if program.trim().is_empty() => Err(RewatchError::ConfigError(
            "command name must not be blank".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

fn ensure_bounded(name: &str, value: Duration) -> Result<()> {
    if value > MAX_DURATION {
        return Err(RewatchError::ConfigError(format!(
            "{name} of {value:?} exceeds the maximum of {MAX_DURATION:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(command: &[&str]) -> RawConfig {
        RawConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            ..RawConfig::default()
        }
    }

    #[test]
    fn empty_command_is_rejected() {
        match Config::try_from(raw(&[])) {
            Err(RewatchError::ConfigError(msg)) => assert!(msg.contains("command")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn blank_program_is_rejected() {
        assert!(matches!(
            Config::try_from(raw(&["  ", "x"])),
            Err(RewatchError::ConfigError(_))
        ));
    }

    #[test]
    fn malformed_exclude_is_rejected_before_anything_runs() {
        let mut r = raw(&["true"]);
        r.excludes = vec!["{unclosed".to_string()];
        match Config::try_from(r) {
            Err(RewatchError::Pattern { pattern, .. }) => assert_eq!(pattern, "{unclosed"),
            other => panic!("expected Pattern error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_durations_are_rejected() {
        let mut r = raw(&["true"]);
        r.debounce = Duration::from_secs(u64::MAX);
        match Config::try_from(r) {
            Err(RewatchError::ConfigError(msg)) => assert!(msg.contains("debounce")),
            other => panic!("expected ConfigError, got {other:?}"),
        }

        let mut r = raw(&["true"]);
        r.graceful_timeout = MAX_DURATION + Duration::from_secs(1);
        assert!(matches!(Config::try_from(r), Err(RewatchError::ConfigError(_))));

        let mut r = raw(&["true"]);
        r.graceful_timeout = MAX_DURATION;
        assert!(Config::try_from(r).is_ok());
    }

    #[test]
    fn valid_config_keeps_defaults() {
        let mut r = raw(&["go", "run", "."]);
        r.includes = vec!["*.go".to_string()];
        let cfg = Config::try_from(r).unwrap();
        assert_eq!(cfg.command(), ["go", "run", "."]);
        assert_eq!(cfg.debounce(), Duration::from_millis(100));
        assert_eq!(cfg.graceful_timeout(), Duration::from_secs(1));
        assert!(cfg.includes().is_match("main.go"));
        assert!(cfg.excludes().is_empty());
    }
}

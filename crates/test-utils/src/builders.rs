#![allow(dead_code)]

use std::time::Duration;

use rewatch::config::{Config, RawConfig};

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    raw: RawConfig,
}

impl ConfigBuilder {
    /// Start from defaults with the given command.
    pub fn new(command: &[&str]) -> Self {
        Self {
            raw: RawConfig {
                command: command.iter().map(|s| s.to_string()).collect(),
                ..RawConfig::default()
            },
        }
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.raw.includes.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.raw.excludes.push(pattern.to_string());
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.raw.debounce = window;
        self
    }

    pub fn graceful_timeout(mut self, timeout: Duration) -> Self {
        self.raw.graceful_timeout = timeout;
        self
    }

    pub fn content_check(mut self, val: bool) -> Self {
        self.raw.content_check = val;
        self
    }

    pub fn exit_on_change(mut self, val: bool) -> Self {
        self.raw.exit_on_change = val;
        self
    }

    pub fn dry_run(mut self, val: bool) -> Self {
        self.raw.dry_run = val;
        self
    }

    pub fn raw(self) -> RawConfig {
        self.raw
    }

    pub fn build(self) -> Config {
        Config::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

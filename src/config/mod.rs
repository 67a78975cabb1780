// src/config/mod.rs

//! Run configuration.
//!
//! - [`model`] holds the unvalidated [`RawConfig`] and the validated,
//!   immutable [`Config`].
//! - [`validate`] turns one into the other.
//! - [`duration`] parses the `100ms` / `1s` style values used on the CLI.

pub mod duration;
pub mod model;
pub mod validate;

pub use model::{Config, RawConfig, DEFAULT_DEBOUNCE, DEFAULT_GRACEFUL_TIMEOUT, MAX_DURATION};

//! Host environment helpers for Quorum.
//!
//! Thin collaborators that the core utilities and their callers rely on:
//!
//! - [`Platform`] / [`OsType`]: host detection, probed once per process
//! - [`next_after`]: cyclic successor lookup for round-robin selection
//! - [`check_state!`]: lazily formatted state checks
//! - [`LogControl`]: runtime log level changes over a `tracing` filter
//! - [`UtilConfig`]: TOML configuration for logging and transfers

pub mod check;
pub mod config;
pub mod error;
pub mod iter;
pub mod logging;
pub mod platform;

pub use check::check_state;
pub use config::{LogDirective, LoggingConfig, UtilConfig};
pub use error::{EnvError, EnvResult};
pub use iter::next_after;
pub use logging::{build_filter, FilterLayer, LogControl};
pub use platform::{OsType, Platform};

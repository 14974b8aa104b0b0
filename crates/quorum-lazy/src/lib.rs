//! Memoizing cells for Quorum.
//!
//! [`LazyCell`] runs a user-supplied initializer at most once per successful
//! population, even when many threads race on first access. Failed
//! initializers leave the cell empty so the next caller retries.
//!
//! # Key Types
//!
//! - [`LazyCell`]: double-checked, per-cell locked memoization
//! - [`LazyError`]: initializer failure or absent result
//! - [`memoize`] / [`memoize_optional`]: constructors for plain closures

pub mod cell;
pub mod error;

pub use cell::{memoize, memoize_optional, LazyCell};
pub use error::{BoxError, LazyError, LazyResult};

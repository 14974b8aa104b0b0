//! Bounded I/O transfers for Quorum.
//!
//! Readers, channels, and skippers may transfer fewer bytes than asked. The
//! functions here loop over those partial transfers until an exact byte count
//! is satisfied, failing with [`TransferError::UnexpectedEof`] when the
//! stream ends first. Every other I/O fault propagates unchanged.
//!
//! - [`read_fully`]: fill `buf[offset..offset + length]`
//! - [`write_fully`]: drain a buffer into a [`PositionalWrite`] channel
//! - [`skip_fully`]: skip an exact byte count through [`Skip`]
//! - [`drain`]: discard a stream to its end
//!
//! [`cleanup`] and [`CloseGuard`] close resources on error paths without
//! letting close failures escape.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod traits;
pub mod transfer;

pub use cleanup::{cleanup, close_quietly, CloseGuard, Closeable};
pub use config::TransferConfig;
pub use error::{as_io_error, interrupted, Operation, TransferError, TransferResult};
pub use traits::{skip_by_reading, PositionalWrite, Skip};
pub use transfer::{drain, drain_with, read_fully, skip_fully, write_fully};

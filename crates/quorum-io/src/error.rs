use std::fmt;
use std::io;

/// Boxed error type used when converting arbitrary failures into I/O errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The bounded operation that hit end of stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Skip,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Errors produced by bounded transfers.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The stream ended before the requested byte count was satisfied.
    #[error("premature EOF during {operation} after {transferred} of {requested} byte(s)")]
    UnexpectedEof {
        operation: Operation,
        requested: u64,
        transferred: u64,
    },

    /// The requested range does not fit in the supplied buffer.
    #[error("range {offset}+{length} exceeds buffer of {capacity} byte(s)")]
    OutOfBounds {
        offset: usize,
        length: usize,
        capacity: usize,
    },

    /// A drain was requested with a zero-sized scratch buffer.
    #[error("drain buffer size must be non-zero")]
    ZeroBuffer,

    /// Any other fault from the underlying reader or channel, unchanged.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl TransferError {
    /// Bytes obtained before end of stream, if this is an EOF error.
    pub fn transferred(&self) -> Option<u64> {
        match self {
            Self::UnexpectedEof { transferred, .. } => Some(*transferred),
            _ => None,
        }
    }

    /// Returns `true` if the stream ended early.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

impl From<TransferError> for io::Error {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Io(inner) => inner,
            TransferError::UnexpectedEof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            TransferError::OutOfBounds { .. } | TransferError::ZeroBuffer => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
        }
    }
}

/// Convenience alias used throughout the transfer crate.
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// An interruption carrying its cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Interrupted {
    message: String,
    #[source]
    source: BoxError,
}

/// Build an [`io::ErrorKind::Interrupted`] error with `cause` attached.
pub fn interrupted(message: impl Into<String>, cause: impl Into<BoxError>) -> io::Error {
    io::Error::new(
        io::ErrorKind::Interrupted,
        Interrupted {
            message: message.into(),
            source: cause.into(),
        },
    )
}

/// Convert any error into an [`io::Error`].
///
/// An `io::Error` passes through unchanged; anything else is wrapped with
/// [`io::ErrorKind::Other`].
pub fn as_io_error(err: BoxError) -> io::Error {
    match err.downcast::<io::Error>() {
        Ok(io_err) => *io_err,
        Err(other) => io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_converts_to_unexpected_eof_kind() {
        let err = TransferError::UnexpectedEof {
            operation: Operation::Read,
            requested: 11,
            transferred: 10,
        };
        assert_eq!(err.transferred(), Some(10));
        assert_eq!(
            err.to_string(),
            "premature EOF during read after 10 of 11 byte(s)"
        );
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn io_error_passes_through_verbatim() {
        let err = TransferError::from(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
        assert!(!err.is_eof());
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(io_err.to_string(), "peer gone");
    }

    #[test]
    fn as_io_error_unwraps_io_errors() {
        let source: BoxError = Box::new(io::Error::new(io::ErrorKind::NotFound, "segment"));
        assert_eq!(as_io_error(source).kind(), io::ErrorKind::NotFound);

        let other: BoxError = "quota exceeded".into();
        let wrapped = as_io_error(other);
        assert_eq!(wrapped.kind(), io::ErrorKind::Other);
        assert_eq!(wrapped.to_string(), "quota exceeded");
    }

    #[test]
    fn interrupted_keeps_cause() {
        let err = interrupted("waiting for leader", "thread interrupted");
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        let inner = err.get_ref().unwrap();
        assert_eq!(inner.to_string(), "waiting for leader");
        assert_eq!(inner.source().unwrap().to_string(), "thread interrupted");
    }
}

/// Boxed error type accepted as an initializer failure cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while populating a [`LazyCell`](crate::LazyCell).
///
/// Both variants are recoverable: the cell stays empty and the next call to
/// `get()` runs the initializer again.
#[derive(Debug, thiserror::Error)]
pub enum LazyError {
    /// The initializer ran but produced no value.
    #[error("initializer produced no value")]
    Absent,

    /// The initializer returned an error.
    #[error("initializer failed: {0}")]
    Failed(#[source] BoxError),
}

impl LazyError {
    /// Wrap any error as an initializer failure.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }
}

/// Result alias for lazy cell operations.
pub type LazyResult<T> = Result<T, LazyError>;

/// Boxed error type produced by constructor bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while resolving or invoking constructors.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// No type is registered under the requested name.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The target type declares no constructor with exactly this signature.
    #[error("no constructor {target}({signature})")]
    NoSuchConstructor {
        target: &'static str,
        signature: String,
    },

    /// A private constructor was invoked directly instead of through a factory.
    #[error("constructor {target}({signature}) is not public")]
    Inaccessible {
        target: &'static str,
        signature: String,
    },

    /// The number of supplied arguments does not match the signature.
    #[error("{target} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        target: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An argument does not have the declared type.
    #[error("argument {index} must be {expected}")]
    ArgumentType { index: usize, expected: &'static str },

    /// The constructor body failed.
    #[error("failed to construct {target}: {source}")]
    Invocation {
        target: &'static str,
        #[source]
        source: BoxError,
    },

    /// The constructed instance is not of the requested type.
    #[error("constructed instance is not a {expected}")]
    Downcast { expected: &'static str },
}

/// Result alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

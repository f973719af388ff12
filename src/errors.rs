use thiserror::Error;

/// Boxed error produced by a factory or constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ActivationError {
    // Factory or constructor failure, surfaced as-is
    #[error(transparent)]
    Construction(BoxError),

    // More dependencies than any constructor can take
    #[error("unsupported constructor arity: {arity} (maximum is {max})")]
    UnsupportedArity { arity: usize, max: usize },

    // Dependency count differs from the typed constructor's parameter count
    #[error("binding `{binding}` takes {expected} argument(s) but {actual} dependencies were supplied")]
    ArityMismatch {
        binding: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("argument {position} is not a `{expected}`")]
    ArgumentType {
        position: usize,
        expected: &'static str,
    },

    // Typed accessor asked for a different type than the one cached
    #[error("cached instance of `{found}` is not a `{expected}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no binding registered for `{0}`")]
    UnregisteredBinding(String),

    // Short name shared by several registered types
    #[error("binding name `{name}` is ambiguous: {}", .candidates.join(", "))]
    AmbiguousBinding {
        name: String,
        candidates: Vec<&'static str>,
    },

    // Property value failed to (de)serialize
    #[error("property `{key}`: {source}")]
    Property {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ActivationError {
    pub(crate) fn construction<E: Into<BoxError>>(err: E) -> Self {
        ActivationError::Construction(err.into())
    }
}

// Type alias for results that use `ActivationError` as the error type
pub type Result<T> = std::result::Result<T, ActivationError>;

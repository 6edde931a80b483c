//! Error types reported by host runtimes

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Failures a host runtime can report back to the reflection engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The object reference does not point at a live object
    #[error("No such object: #{0}")]
    NoSuchObject(u64),

    /// A member declaration does not belong to the type it was used with
    #[error("No such member: {0}")]
    NoSuchMember(String),

    /// Normal assignment was attempted on a readonly field
    #[error("Field '{0}' is readonly")]
    ImmutableField(String),

    /// A value of the wrong kind was offered to a field
    #[error("Field '{field}' cannot hold a {found} value")]
    IncompatibleValue {
        /// Field name
        field: String,
        /// Kind of the rejected value
        found: &'static str,
    },

    /// An instance member was accessed without a receiver
    #[error("Member '{0}' requires a receiver")]
    MissingReceiver(String),

    /// Wrong number of arguments for a method or constructor
    #[error("Arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// A raw offset does not map to a storage slot of the given base
    #[error("Invalid field offset {0}")]
    InvalidOffset(u64),

    /// The host does not provide the requested capability
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The invoked member itself failed
    #[error("Invocation failed: {0}")]
    Invocation(String),
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError::Invocation(s)
    }
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError::Invocation(s.to_string())
    }
}

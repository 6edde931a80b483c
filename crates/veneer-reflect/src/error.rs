//! Error types for symbol resolution and member access
//!
//! Every variant is absorbed at the accessor boundary (`get`, `set`,
//! `invoke`, `new_instance`) and only surfaces through the `try_*` forms.

use std::fmt;

use veneer_sdk::HostError;

/// Result type for reflection operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// What kind of symbol a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A type
    Type,
    /// A field
    Field,
    /// A method
    Method,
    /// A constructor
    Constructor,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Type => "type",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
        })
    }
}

/// Reflection errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// The symbol does not exist in the live type universe
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Kind of symbol
        kind: SymbolKind,
        /// Name or description used for the lookup
        name: String,
    },

    /// The symbol exists but has an incompatible shape
    #[error("Type mismatch for {name}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Symbol being accessed
        name: String,
        /// What the caller expected
        expected: String,
        /// What the host reported
        found: String,
    },

    /// A readonly field was written before immutability was removed
    #[error("Field '{field}' is readonly; call remove_immutability first")]
    ImmutabilityViolation {
        /// Field name
        field: String,
    },

    /// The privileged memory capability is unavailable
    #[error("Privileged memory access unavailable: {0}")]
    UnsupportedPlatform(String),

    /// The host version token is required but could not be determined
    #[error("Cannot determine host version from root type '{0}'")]
    UnknownVersion(String),

    /// A locator names a namespace missing from the configuration
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    /// The host reported a failure
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ReflectError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(kind: SymbolKind, name: impl Into<String>) -> Self {
        ReflectError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Whether this error means "the symbol is absent" rather than a fault
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            ReflectError::NotFound { .. }
                | ReflectError::TypeMismatch { .. }
                | ReflectError::UnknownVersion(_)
                | ReflectError::UnknownNamespace(_)
        )
    }
}

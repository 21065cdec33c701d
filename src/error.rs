//! Error types for canonid.
//!
//! All errors are strongly typed using thiserror. A query that finds no
//! existing entity is not an error: it is `None`, and the resolver mints a
//! new identifier for it.

use thiserror::Error;

use crate::entity::CanonicalId;

/// Validation errors raised before a batch mutates anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name at position {position} is empty or whitespace-only")]
    EmptyName {
        position: usize,
    },

    #[error("Name at position {position} has {length} characters, exceeding maximum length of {max_length}")]
    NameTooLong {
        position: usize,
        length: usize,
        max_length: usize,
    },

    #[error("Invalid resolver configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Top-level error type for canonid.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Identifier space exhausted (next id: {next_id})")]
    IdSpaceExhausted {
        next_id: CanonicalId,
    },

    #[error("Poisoned lock: {context}")]
    LockPoisoned {
        context: &'static str,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ResolveError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if this error is retryable.
    ///
    /// The resolver performs no I/O, so nothing it reports is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::IdSpaceExhausted { .. }
            | Self::LockPoisoned { .. }
            | Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for canonid operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

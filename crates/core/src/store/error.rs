//! Store errors.

use core::fmt;

use thiserror::Error;

/// The kind of record a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Customer,
    Purchase,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Purchase => f.write_str("purchase"),
        }
    }
}

/// Errors produced by [`CustomerStore`](super::CustomerStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced id does not exist in its scope.
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },
}

impl StoreError {
    pub(crate) fn customer(id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: ResourceKind::Customer,
            id: id.to_string(),
        }
    }

    pub(crate) fn purchase(id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: ResourceKind::Purchase,
            id: id.to_string(),
        }
    }

    /// Which kind of record was missing.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::NotFound { kind, .. } => *kind,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

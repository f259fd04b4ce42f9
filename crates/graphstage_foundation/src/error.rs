//! Error types for graphstage.
//!
//! Uses `thiserror` for ergonomic error definition. The taxonomy is narrow on
//! purpose: removing an untracked entity, detaching from an empty slot and
//! skipping unsupported slot shapes are not errors at all.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Convenience result alias used across graphstage.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for graphstage operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Name of the store operation that failed, if known.
    pub operation: Option<&'static str>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            operation: None,
        }
    }

    /// Records which store operation raised this error.
    #[must_use]
    pub fn during(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Creates a borrow conflict error.
    #[must_use]
    pub fn borrow_conflict(entity: EntityId, type_name: &'static str) -> Self {
        Self::new(ErrorKind::BorrowConflict { entity, type_name })
    }

    /// Creates an unknown slot error.
    #[must_use]
    pub fn unknown_slot(type_name: &'static str, slot: &'static str) -> Self {
        Self::new(ErrorKind::UnknownSlot { type_name, slot })
    }

    /// Creates a slot kind mismatch error.
    #[must_use]
    pub fn slot_kind_mismatch(
        type_name: &'static str,
        slot: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::new(ErrorKind::SlotKindMismatch {
            type_name,
            slot,
            expected,
            actual,
        })
    }

    /// Creates a limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: StoreLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An entity instance was already borrowed when the store needed it.
    #[error("cannot borrow {type_name} {entity:?}: already borrowed")]
    BorrowConflict {
        /// The entity that could not be borrowed.
        entity: EntityId,
        /// Type name from the entity's schema.
        type_name: &'static str,
    },

    /// A detach descriptor names a slot the owner's schema does not define.
    #[error("unknown slot {slot} on {type_name}")]
    UnknownSlot {
        /// Type name from the owner's schema.
        type_name: &'static str,
        /// The slot that was requested.
        slot: &'static str,
    },

    /// A detach descriptor disagrees with the registered slot kind.
    #[error("slot {type_name}.{slot} is {actual}, expected {expected}")]
    SlotKindMismatch {
        /// Type name from the owner's schema.
        type_name: &'static str,
        /// The slot that was requested.
        slot: &'static str,
        /// Kind named by the descriptor.
        expected: &'static str,
        /// Kind registered in the schema.
        actual: &'static str,
    },

    /// A configured store limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(StoreLimit),
}

/// Configurable limits that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLimit {
    /// A single walk reached more entities than allowed.
    MaxTracked {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for StoreLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxTracked { limit } => write!(f, "max tracked entities ({limit}) exceeded"),
        }
    }
}

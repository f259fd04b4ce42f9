//! Relationship discovery and detach descriptors.
//!
//! Discovery looks at one instance only and reports its direct children.
//! Following children further is the walker's job.

use graphstage_foundation::{EntityId, Result};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::handle::EntityHandle;
use crate::schema::{SchemaCache, SlotKind};

/// Which kind of slot a detach descriptor acts on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetachKind {
    /// Clear a single reference.
    Singular,
    /// Drop one element from a collection.
    Plural,
}

impl DetachKind {
    /// The slot kind this descriptor acts on.
    #[must_use]
    pub const fn slot_kind(self) -> SlotKind {
        match self {
            Self::Singular => SlotKind::Singular,
            Self::Plural => SlotKind::Plural,
        }
    }

    /// The descriptor kind for a slot kind, if that slot is a relationship.
    #[must_use]
    pub const fn for_slot(kind: SlotKind) -> Option<Self> {
        match kind {
            SlotKind::Singular => Some(Self::Singular),
            SlotKind::Plural => Some(Self::Plural),
            SlotKind::Scalar | SlotKind::Keyed => None,
        }
    }
}

/// Severs exactly one edge: `owner.slot -> target`.
///
/// Singular: the slot is cleared if it still holds `target`.
/// Plural: the collection is replaced by a fresh one without `target`,
/// keeping the order of the other elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Detach {
    /// Slot shape.
    pub kind: DetachKind,
    /// Entity holding the slot.
    pub owner: EntityId,
    /// Slot name from the owner's schema.
    pub slot: &'static str,
    /// Entity the edge points at.
    pub target: EntityId,
}

/// One discovered edge from a parent to a direct child.
#[derive(Clone, Debug)]
pub struct Relationship {
    child: EntityHandle,
    detach: Detach,
}

impl Relationship {
    pub(crate) fn new(
        owner: EntityId,
        slot: &'static str,
        kind: DetachKind,
        child: EntityHandle,
    ) -> Self {
        let detach = Detach {
            kind,
            owner,
            slot,
            target: child.id(),
        };
        Self { child, detach }
    }

    /// The child entity.
    #[must_use]
    pub fn child(&self) -> &EntityHandle {
        &self.child
    }

    /// Slot name on the parent.
    #[must_use]
    pub fn slot(&self) -> &'static str {
        self.detach.slot
    }

    /// Singular or plural.
    #[must_use]
    pub fn kind(&self) -> DetachKind {
        self.detach.kind
    }

    /// How to sever this edge.
    #[must_use]
    pub fn detach(&self) -> &Detach {
        &self.detach
    }
}

/// Lists the direct children of `entity` as they are right now.
///
/// Singular slots come first, then plural slots, each in schema order;
/// plural elements keep collection order. Null slots and empty collections
/// yield nothing.
///
/// # Errors
///
/// Returns an error if the instance is mutably borrowed elsewhere.
pub fn discover(entity: &EntityHandle, schemas: &mut SchemaCache) -> Result<Vec<Relationship>> {
    entity.tracked().relationships(entity.id(), schemas)
}

/// Applies a detach descriptor to its owner.
///
/// Returns false if the edge was already gone (null slot, element missing),
/// which counts as success.
///
/// # Errors
///
/// Returns an error if the owner is borrowed elsewhere, or if the descriptor
/// does not match the owner's schema.
///
/// # Panics
///
/// Debug builds assert that `owner` is the descriptor's owner.
pub fn execute_detach(
    detach: &Detach,
    owner: &EntityHandle,
    schemas: &mut SchemaCache,
) -> Result<bool> {
    debug_assert_eq!(owner.id(), detach.owner);
    let severed = owner.tracked().detach(detach, schemas)?;
    trace!(
        owner = ?detach.owner,
        slot = detach.slot,
        target = ?detach.target,
        severed,
        "detach"
    );
    Ok(severed)
}

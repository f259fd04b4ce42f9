//! Tracking unit wrapping one entity instance.

use graphstage_foundation::EntityId;

use crate::handle::EntityHandle;
use crate::relationship::{Detach, Relationship};
use crate::schema::{Entity, Shared};

/// One tracked entity.
///
/// The relationships are a snapshot taken when the node was wrapped; the
/// entity may have been mutated since. `detach` severs the edge through which
/// the entity was first reached, and is `None` when it was reached as a root.
#[derive(Clone, Debug)]
pub struct Node {
    handle: EntityHandle,
    relationships: Vec<Relationship>,
    detach: Option<Detach>,
}

impl Node {
    pub(crate) fn new(
        handle: EntityHandle,
        relationships: Vec<Relationship>,
        detach: Option<Detach>,
    ) -> Self {
        Self {
            handle,
            relationships,
            detach,
        }
    }

    /// Identity of the wrapped entity.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.handle.id()
    }

    /// Type-erased handle to the wrapped entity.
    #[must_use]
    pub fn handle(&self) -> &EntityHandle {
        &self.handle
    }

    /// The wrapped entity, if it is a `T`.
    #[must_use]
    pub fn entity<T: Entity>(&self) -> Option<Shared<T>> {
        self.handle.downcast()
    }

    /// Relationships as discovered when the node was wrapped.
    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// How to sever the edge that introduced this entity.
    #[must_use]
    pub fn detach(&self) -> Option<&Detach> {
        self.detach.as_ref()
    }

    pub(crate) fn with_detach(mut self, detach: Option<Detach>) -> Self {
        self.detach = detach;
        self
    }
}

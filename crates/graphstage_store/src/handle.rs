//! Type-erased handles to tracked entity instances.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use graphstage_foundation::{EntityId, Error, Result};

use crate::relationship::{Detach, DetachKind, Relationship};
use crate::schema::{Entity, SchemaCache, Shared};

/// Operations the store needs on an instance whose type it no longer knows.
pub(crate) trait Tracked {
    /// Type name registered in the instance's schema.
    fn type_name(&self, schemas: &mut SchemaCache) -> &'static str;

    /// Direct children of the instance, singular slots first.
    fn relationships(&self, owner: EntityId, schemas: &mut SchemaCache)
    -> Result<Vec<Relationship>>;

    /// Severs the edge named by `detach`. Returns false if already severed.
    fn detach(&self, detach: &Detach, schemas: &mut SchemaCache) -> Result<bool>;
}

impl<T: Entity> Tracked for RefCell<T> {
    fn type_name(&self, schemas: &mut SchemaCache) -> &'static str {
        schemas.get::<T>().type_name()
    }

    fn relationships(
        &self,
        owner: EntityId,
        schemas: &mut SchemaCache,
    ) -> Result<Vec<Relationship>> {
        let schema = schemas.get::<T>();
        let value = self
            .try_borrow()
            .map_err(|_| Error::borrow_conflict(owner, schema.type_name()))?;

        let mut found = Vec::new();
        for slot in schema.relationship_slots() {
            let Some(kind) = DetachKind::for_slot(slot.kind()) else {
                continue;
            };
            for child in slot.children(&value) {
                found.push(Relationship::new(owner, slot.name(), kind, child));
            }
        }
        Ok(found)
    }

    fn detach(&self, detach: &Detach, schemas: &mut SchemaCache) -> Result<bool> {
        let schema = schemas.get::<T>();
        let slot = schema
            .slot(detach.slot)
            .ok_or_else(|| Error::unknown_slot(schema.type_name(), detach.slot))?;

        let expected = detach.kind.slot_kind();
        if slot.kind() != expected {
            return Err(Error::slot_kind_mismatch(
                schema.type_name(),
                detach.slot,
                expected.name(),
                slot.kind().name(),
            ));
        }

        let mut value = self
            .try_borrow_mut()
            .map_err(|_| Error::borrow_conflict(detach.owner, schema.type_name()))?;
        Ok(slot.detach(&mut value, detach.target))
    }
}

/// Handle to one entity instance with its concrete type erased.
///
/// Cloning a handle clones the strong reference; the identity is unchanged.
#[derive(Clone)]
pub struct EntityHandle {
    id: EntityId,
    type_id: TypeId,
    tracked: Rc<dyn Tracked>,
    any: Rc<dyn Any>,
}

impl EntityHandle {
    /// Wraps a shared entity instance.
    #[must_use]
    pub fn new<T: Entity>(entity: Shared<T>) -> Self {
        let id = EntityId::of(&entity);
        let any: Rc<dyn Any> = Rc::clone(&entity) as Rc<dyn Any>;
        let tracked: Rc<dyn Tracked> = entity;
        Self {
            id,
            type_id: TypeId::of::<T>(),
            tracked,
            any,
        }
    }

    /// Identity of the wrapped instance.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Type name registered in the wrapped instance's schema.
    pub fn type_name(&self, schemas: &mut SchemaCache) -> &'static str {
        self.tracked.type_name(schemas)
    }

    /// Returns true if the wrapped instance is exactly a `T`.
    #[must_use]
    pub fn is<T: Entity>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Recovers the typed instance, if it is a `T`.
    #[must_use]
    pub fn downcast<T: Entity>(&self) -> Option<Shared<T>> {
        Rc::clone(&self.any).downcast::<RefCell<T>>().ok()
    }

    pub(crate) fn tracked(&self) -> &dyn Tracked {
        self.tracked.as_ref()
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.id)
            .field("type_id", &self.type_id)
            .finish()
    }
}

//! Schema registration for entity types.
//!
//! A schema describes the fields of one entity type and how to reach the
//! entities it references. Only singular and plural slots are relationships;
//! scalar and keyed fields are described so the shape is complete, and are
//! skipped by discovery.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use graphstage_foundation::EntityId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::handle::EntityHandle;

/// Shared, mutable entity instance. Identity is the allocation.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value as a shared entity instance.
#[must_use]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// A type whose instances can be tracked by the store.
///
/// Implementors describe their fields once through [`Schema`]:
///
/// ```
/// use graphstage_store::{Entity, Schema, Shared};
///
/// struct Author;
///
/// impl Entity for Author {
///     fn schema() -> Schema<Self> {
///         Schema::<Self>::new("Author")
///     }
/// }
///
/// struct Blog {
///     id: u32,
///     author: Option<Shared<Author>>,
///     contributors: Option<Vec<Shared<Author>>>,
/// }
///
/// impl Entity for Blog {
///     fn schema() -> Schema<Self> {
///         Schema::<Self>::new("Blog")
///             .scalar("id")
///             .singular("author", |b| &b.author, |b| &mut b.author)
///             .plural("contributors", |b| &b.contributors, |b| &mut b.contributors)
///     }
/// }
/// ```
pub trait Entity: Sized + 'static {
    /// Describes the fields of this type.
    fn schema() -> Schema<Self>;
}

/// The shape of a described field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SlotKind {
    /// A value field (number, string, enum). Never tracked.
    Scalar,
    /// A single optional entity reference.
    Singular,
    /// An ordered, optional collection of entity references.
    Plural,
    /// A collection keyed by a second type (map-like). Skipped by discovery.
    Keyed,
}

impl SlotKind {
    /// Returns true if discovery follows slots of this kind.
    #[must_use]
    pub const fn is_relationship(self) -> bool {
        matches!(self, Self::Singular | Self::Plural)
    }

    /// Lowercase name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Singular => "singular",
            Self::Plural => "plural",
            Self::Keyed => "keyed",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-erased access to one relationship slot of an owner `T`.
pub(crate) trait SlotAccess<T> {
    /// Current children in slot order.
    fn children(&self, owner: &T) -> Vec<EntityHandle>;

    /// Severs the edge to `target`. Returns false if there was nothing to sever.
    fn detach(&self, owner: &mut T, target: EntityId) -> bool;
}

struct SingularAccess<T, C> {
    get: fn(&T) -> &Option<Shared<C>>,
    get_mut: fn(&mut T) -> &mut Option<Shared<C>>,
}

impl<T, C: Entity> SlotAccess<T> for SingularAccess<T, C> {
    fn children(&self, owner: &T) -> Vec<EntityHandle> {
        (self.get)(owner)
            .iter()
            .map(|child| EntityHandle::new(Rc::clone(child)))
            .collect()
    }

    fn detach(&self, owner: &mut T, target: EntityId) -> bool {
        let slot = (self.get_mut)(owner);
        if slot.as_ref().is_some_and(|child| EntityId::of(child) == target) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

struct PluralAccess<T, C> {
    get: fn(&T) -> &Option<Vec<Shared<C>>>,
    get_mut: fn(&mut T) -> &mut Option<Vec<Shared<C>>>,
}

impl<T, C: Entity> SlotAccess<T> for PluralAccess<T, C> {
    fn children(&self, owner: &T) -> Vec<EntityHandle> {
        (self.get)(owner)
            .iter()
            .flatten()
            .map(|child| EntityHandle::new(Rc::clone(child)))
            .collect()
    }

    fn detach(&self, owner: &mut T, target: EntityId) -> bool {
        let slot = (self.get_mut)(owner);
        let Some(items) = slot.as_ref() else {
            return false;
        };
        if !items.iter().any(|child| EntityId::of(child) == target) {
            return false;
        }
        // Fresh container; the caller may still hold the old one.
        let kept: Vec<Shared<C>> = items
            .iter()
            .filter(|child| EntityId::of(child) != target)
            .cloned()
            .collect();
        *slot = Some(kept);
        true
    }
}

/// Description of one field of `T`.
pub struct SlotSchema<T> {
    name: &'static str,
    kind: SlotKind,
    access: Option<Box<dyn SlotAccess<T>>>,
}

impl<T> SlotSchema<T> {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field shape.
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub(crate) fn children(&self, owner: &T) -> Vec<EntityHandle> {
        self.access
            .as_ref()
            .map_or_else(Vec::new, |access| access.children(owner))
    }

    pub(crate) fn detach(&self, owner: &mut T, target: EntityId) -> bool {
        self.access
            .as_ref()
            .is_some_and(|access| access.detach(owner, target))
    }
}

impl<T> fmt::Debug for SlotSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotSchema")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Schema definition for an entity type.
pub struct Schema<T> {
    type_name: &'static str,
    slots: Vec<SlotSchema<T>>,
}

impl<T: Entity> Schema<T> {
    /// Creates an empty schema.
    ///
    /// Inside [`Entity::schema`] spell it `Schema::<Self>::new`, so the
    /// accessor closures passed to [`singular`](Self::singular) and
    /// [`plural`](Self::plural) know their argument type.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            slots: Vec::new(),
        }
    }

    /// Describes a value field.
    #[must_use]
    pub fn scalar(self, name: &'static str) -> Self {
        self.with_slot(name, SlotKind::Scalar, None)
    }

    /// Describes a map-like field. Its values are not tracked.
    #[must_use]
    pub fn keyed(self, name: &'static str) -> Self {
        self.with_slot(name, SlotKind::Keyed, None)
    }

    /// Describes a single optional reference to another entity.
    #[must_use]
    pub fn singular<C: Entity>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<Shared<C>>,
        get_mut: fn(&mut T) -> &mut Option<Shared<C>>,
    ) -> Self {
        let access = SingularAccess { get, get_mut };
        self.with_slot(name, SlotKind::Singular, Some(Box::new(access)))
    }

    /// Describes an ordered collection of references to other entities.
    #[must_use]
    pub fn plural<C: Entity>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<Vec<Shared<C>>>,
        get_mut: fn(&mut T) -> &mut Option<Vec<Shared<C>>>,
    ) -> Self {
        let access = PluralAccess { get, get_mut };
        self.with_slot(name, SlotKind::Plural, Some(Box::new(access)))
    }

    fn with_slot(
        mut self,
        name: &'static str,
        kind: SlotKind,
        access: Option<Box<dyn SlotAccess<T>>>,
    ) -> Self {
        self.slots.push(SlotSchema { name, kind, access });
        self
    }
}

impl<T> Schema<T> {
    /// Type name given at registration.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All described fields, in registration order.
    #[must_use]
    pub fn slots(&self) -> &[SlotSchema<T>] {
        &self.slots
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotSchema<T>> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Fields of the given kind, in registration order.
    pub fn slots_of(&self, kind: SlotKind) -> impl Iterator<Item = &SlotSchema<T>> {
        self.slots.iter().filter(move |s| s.kind == kind)
    }

    /// Fields discovery follows: singular slots first, then plural slots.
    pub fn relationship_slots(&self) -> impl Iterator<Item = &SlotSchema<T>> {
        self.slots_of(SlotKind::Singular)
            .chain(self.slots_of(SlotKind::Plural))
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Schemas built so far, one per entity type.
#[derive(Clone, Default)]
pub struct SchemaCache {
    schemas: HashMap<TypeId, Rc<dyn Any>>,
}

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema for `T`, building it on first use.
    pub fn get<T: Entity>(&mut self) -> Rc<Schema<T>> {
        if let Some(cached) = self.schemas.get(&TypeId::of::<T>()) {
            if let Ok(schema) = Rc::clone(cached).downcast::<Schema<T>>() {
                return schema;
            }
        }
        let schema = Rc::new(T::schema());
        self.schemas
            .insert(TypeId::of::<T>(), Rc::clone(&schema) as Rc<dyn Any>);
        schema
    }

    /// Number of cached schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schema has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("len", &self.schemas.len())
            .finish()
    }
}

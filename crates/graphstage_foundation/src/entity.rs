//! Entity identifiers derived from reference identity.

use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of an entity instance.
///
/// Two entities are the same iff they live in the same shared allocation.
/// Value equality plays no part: two instances with identical fields have
/// different identities.
///
/// An identity is only meaningful while something keeps the allocation
/// alive. The store holds a strong reference to every tracked entity and
/// re-points any detach descriptor whose owner it stops tracking, so no
/// address it acts on can be recycled.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(usize);

impl EntityId {
    /// Returns the identity of the value behind a shared pointer.
    ///
    /// Works for sized and unsized pointees alike, so a handle coerced to a
    /// trait object has the same identity as the concrete handle.
    #[must_use]
    pub fn of<T: ?Sized>(shared: &Rc<T>) -> Self {
        Self(Rc::as_ptr(shared).cast::<()>() as usize)
    }

    /// Creates an identity from a raw address.
    ///
    /// Intended for tests and diagnostics; ids built this way do not refer
    /// to any live entity.
    #[must_use]
    pub const fn from_raw(addr: usize) -> Self {
        Self(addr)
    }

    /// Returns the raw address backing this identity.
    #[must_use]
    pub const fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:#x})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({:#x})", self.0)
    }
}

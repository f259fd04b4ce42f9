//! Depth-first graph walking with identity deduplication.

use std::collections::HashSet;

use graphstage_foundation::{EntityId, Error, Result, StoreLimit};
use tracing::trace;

use crate::handle::EntityHandle;
use crate::node::Node;
use crate::relationship::{Detach, discover};
use crate::schema::SchemaCache;

/// A walk over everything reachable from a set of roots.
///
/// Visits depth-first in discovery order and wraps each distinct instance
/// exactly once, so cycles and shared children terminate.
#[derive(Debug, Clone)]
pub struct Walk {
    roots: Vec<EntityHandle>,
    excluded: Option<EntityId>,
    limit: Option<usize>,
}

impl Walk {
    /// Creates a walk seeded with `roots`, visited in the given order.
    pub fn from_roots(roots: impl IntoIterator<Item = EntityHandle>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            excluded: None,
            limit: None,
        }
    }

    /// Treats `id` as already visited: it is never wrapped and nothing is
    /// reached through it.
    #[must_use]
    pub fn excluding(mut self, id: EntityId) -> Self {
        self.excluded = Some(id);
        self
    }

    /// Fails the walk once it would produce more than `limit` nodes.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Runs the walk against live object state.
    ///
    /// Roots get no detach descriptor unless they are first reached as the
    /// child of an earlier root.
    ///
    /// # Errors
    ///
    /// Returns an error if an instance cannot be borrowed, or if the walk
    /// exceeds its limit.
    pub fn run(self, schemas: &mut SchemaCache) -> Result<Vec<Node>> {
        let mut visited: HashSet<EntityId> = HashSet::new();
        if let Some(id) = self.excluded {
            visited.insert(id);
        }

        let mut stack: Vec<(EntityHandle, Option<Detach>)> =
            self.roots.into_iter().rev().map(|root| (root, None)).collect();
        let mut nodes = Vec::new();

        while let Some((handle, detach)) = stack.pop() {
            if !visited.insert(handle.id()) {
                continue;
            }
            if let Some(limit) = self.limit {
                if nodes.len() >= limit {
                    return Err(Error::limit_exceeded(StoreLimit::MaxTracked { limit }));
                }
            }

            let relationships = discover(&handle, schemas)?;
            for relationship in relationships.iter().rev() {
                if !visited.contains(&relationship.child().id()) {
                    stack.push((
                        relationship.child().clone(),
                        Some(relationship.detach().clone()),
                    ));
                }
            }

            trace!(
                entity = ?handle.id(),
                type_name = handle.type_name(schemas),
                children = relationships.len(),
                "wrapped"
            );
            nodes.push(Node::new(handle, relationships, detach));
        }

        Ok(nodes)
    }
}

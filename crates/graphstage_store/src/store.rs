//! The entity store: tracked nodes, roots, and reconciliation.
//!
//! The store keeps a flat, ordered set of every tracked entity keyed by
//! identity, plus the roots passed to [`EntityStore::add`]. Removal and
//! commit both decide what to keep by walking live object state from the
//! surviving roots and purging whatever the walk no longer reaches.

use std::collections::HashSet;
use std::rc::Rc;

use graphstage_foundation::{EntityId, Result};
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::handle::EntityHandle;
use crate::node::Node;
use crate::relationship::{Detach, discover, execute_detach};
use crate::schema::{Entity, SchemaCache, Shared};
use crate::walk::Walk;

/// Counts reported by [`EntityStore::commit_with_summary`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Entities newly reached from the roots.
    pub added: usize,
    /// Entities no longer reachable, dropped from the store.
    pub purged: usize,
}

/// In-memory store of an object graph.
///
/// Clone is O(1) due to structural sharing. A clone shares the entity
/// instances themselves, so it snapshots tracking state only.
///
/// Single-threaded by construction: entities are `Rc<RefCell<_>>`.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    /// Tracked nodes by identity.
    nodes: im::HashMap<EntityId, Node>,
    /// Store order (first insertion).
    order: im::Vector<EntityId>,
    /// Entities passed to `add`, in order.
    roots: im::Vector<EntityId>,
    schemas: SchemaCache,
    config: StoreConfig,
}

impl EntityStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Mutation ---

    /// Tracks `entity` as a root, along with everything reachable from it.
    ///
    /// Entities already tracked keep their existing node; the first
    /// insertion wins.
    ///
    /// # Errors
    ///
    /// Returns an error if an instance cannot be borrowed during the walk or
    /// the walk exceeds `max_tracked`. Nothing is inserted in that case.
    pub fn add<T: Entity>(&mut self, entity: &Shared<T>) -> Result<()> {
        let root = EntityHandle::new(Rc::clone(entity));
        let root_id = root.id();

        let walked = Walk::from_roots([root])
            .with_limit(self.config.max_tracked)
            .run(&mut self.schemas)
            .map_err(|e| e.during("add"))?;

        let mut added = 0;
        for node in walked {
            if self.insert_node(node) {
                added += 1;
            }
        }
        if !self.is_root(root_id) {
            self.roots.push_back(root_id);
        }

        debug!(root = ?root_id, added, tracked = self.len(), "add");
        Ok(())
    }

    /// Stops tracking `entity`, cascading to children nothing else reaches.
    ///
    /// The edge that introduced `entity` is severed first (and, with
    /// `sever_all_incoming`, every other live edge from a tracked owner).
    /// Then every tracked entity no longer reachable from a surviving root is
    /// purged, `entity` included. Untracked entities are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an instance cannot be borrowed. Edges severed
    /// before the failure stay severed.
    pub fn remove<T: Entity>(&mut self, entity: &Shared<T>) -> Result<()> {
        self.remove_id(EntityId::of(entity))
    }

    /// Identity-based form of [`remove`](Self::remove).
    ///
    /// # Errors
    ///
    /// See [`remove`](Self::remove).
    pub fn remove_id(&mut self, id: EntityId) -> Result<()> {
        let Some(node) = self.nodes.get(&id).cloned() else {
            trace!(entity = ?id, "remove of untracked entity");
            return Ok(());
        };

        self.roots = self.roots.iter().copied().filter(|r| *r != id).collect();
        if let Some(detach) = node.detach() {
            self.apply_detach(detach).map_err(|e| e.during("remove"))?;
        }
        let severed = if self.config.sever_all_incoming {
            self.sever_incoming(id).map_err(|e| e.during("remove"))?
        } else {
            0
        };

        let survivors = Walk::from_roots(self.root_handles())
            .excluding(id)
            .run(&mut self.schemas)
            .map_err(|e| e.during("remove"))?;
        let reachable: HashSet<EntityId> = survivors.iter().map(Node::id).collect();
        let purged = self.purge(|candidate| !reachable.contains(candidate));
        let repaired = self.repair_detaches(&survivors);

        debug!(entity = ?id, severed, purged, repaired, tracked = self.len(), "remove");
        Ok(())
    }

    /// Reconciles the store with live object state.
    ///
    /// # Errors
    ///
    /// See [`commit_with_summary`](Self::commit_with_summary).
    pub fn commit(&mut self) -> Result<()> {
        self.commit_with_summary().map(|_| ())
    }

    /// Re-walks every root against live object state, tracks newly reachable
    /// entities and purges the ones no longer reached.
    ///
    /// # Errors
    ///
    /// Returns an error if an instance cannot be borrowed or the walk exceeds
    /// `max_tracked`. The store is left untouched in that case.
    pub fn commit_with_summary(&mut self) -> Result<CommitSummary> {
        let fresh = Walk::from_roots(self.root_handles())
            .with_limit(self.config.max_tracked)
            .run(&mut self.schemas)
            .map_err(|e| e.during("commit"))?;

        let reachable: HashSet<EntityId> = fresh.iter().map(Node::id).collect();
        let purged = self.purge(|candidate| !reachable.contains(candidate));
        if !self.config.refresh_on_commit {
            self.repair_detaches(&fresh);
        }

        let mut added = 0;
        for node in fresh {
            let id = node.id();
            if self.nodes.contains_key(&id) {
                if self.config.refresh_on_commit {
                    self.nodes.insert(id, node);
                }
            } else if self.insert_node(node) {
                added += 1;
            }
        }

        debug!(added, purged, tracked = self.len(), "commit");
        Ok(CommitSummary { added, purged })
    }

    /// Drops all tracking state. Entities themselves are untouched.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.roots.clear();
    }

    // --- Queries ---

    /// All tracked entities of exactly type `T`, in store order.
    #[must_use]
    pub fn query<T: Entity>(&self) -> Vec<Shared<T>> {
        self.iter().filter_map(Node::entity::<T>).collect()
    }

    /// Number of tracked entities of exactly type `T`.
    #[must_use]
    pub fn count<T: Entity>(&self) -> usize {
        self.iter().filter(|node| node.handle().is::<T>()).count()
    }

    /// Returns true if `entity` is tracked.
    #[must_use]
    pub fn contains<T: Entity>(&self, entity: &Shared<T>) -> bool {
        self.is_tracked(EntityId::of(entity))
    }

    /// Returns true if an entity with this identity is tracked.
    #[must_use]
    pub fn is_tracked(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns true if `id` was passed to `add` and is still tracked.
    #[must_use]
    pub fn is_root(&self, id: EntityId) -> bool {
        self.roots.iter().any(|r| *r == id)
    }

    /// Root identities, in the order they were added.
    pub fn roots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.roots.iter().copied()
    }

    /// The node tracking `id`, if any.
    #[must_use]
    pub fn node(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// All nodes, in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Internals ---

    /// Inserts a node unless its identity is already tracked.
    fn insert_node(&mut self, node: Node) -> bool {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.order.push_back(id);
        self.nodes.insert(id, node);
        true
    }

    fn root_handles(&self) -> Vec<EntityHandle> {
        self.roots
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.handle().clone())
            .collect()
    }

    /// Runs a detach descriptor against its owner. An owner that is no longer
    /// tracked has nothing left to sever.
    fn apply_detach(&mut self, detach: &Detach) -> Result<bool> {
        let Some(owner) = self.nodes.get(&detach.owner) else {
            trace!(owner = ?detach.owner, "detach owner no longer tracked");
            return Ok(false);
        };
        execute_detach(detach, owner.handle(), &mut self.schemas)
    }

    /// Replaces every detach descriptor whose owner is no longer tracked with
    /// the one `walked` reached the node through.
    ///
    /// Tracked owners are kept alive by their node, so a descriptor whose
    /// owner was purged could otherwise name a reused address.
    fn repair_detaches(&mut self, walked: &[Node]) -> usize {
        let mut repaired = 0;
        for fresh in walked {
            let Some(node) = self.nodes.get(&fresh.id()) else {
                continue;
            };
            let stale = node
                .detach()
                .is_some_and(|detach| !self.nodes.contains_key(&detach.owner));
            if stale {
                let node = node.clone().with_detach(fresh.detach().cloned());
                self.nodes.insert(fresh.id(), node);
                repaired += 1;
            }
        }
        repaired
    }

    /// Severs every live edge from a tracked owner to `target`.
    fn sever_incoming(&mut self, target: EntityId) -> Result<usize> {
        let owners: Vec<EntityHandle> = self
            .iter()
            .filter(|node| node.id() != target)
            .map(|node| node.handle().clone())
            .collect();

        let mut severed = 0;
        for owner in owners {
            for relationship in discover(&owner, &mut self.schemas)? {
                if relationship.child().id() == target
                    && execute_detach(relationship.detach(), &owner, &mut self.schemas)?
                {
                    severed += 1;
                }
            }
        }
        Ok(severed)
    }

    /// Drops every node matching `doomed`. Returns how many were dropped.
    fn purge(&mut self, doomed: impl Fn(&EntityId) -> bool) -> usize {
        let victims: Vec<EntityId> = self.order.iter().copied().filter(|id| doomed(id)).collect();
        for id in &victims {
            self.nodes.remove(id);
        }
        if !victims.is_empty() {
            self.order = self
                .order
                .iter()
                .copied()
                .filter(|id| self.nodes.contains_key(id))
                .collect();
            self.roots = self
                .roots
                .iter()
                .copied()
                .filter(|id| self.nodes.contains_key(id))
                .collect();
        }
        victims.len()
    }
}

//! Configuration for the entity store.

/// Configuration for an [`EntityStore`](crate::EntityStore).
///
/// Controls walk limits and how aggressively removal and commit reconcile
/// the tracked graph with live object state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on entities produced by a single walk (`None` = unbounded).
    pub max_tracked: Option<usize>,

    /// On remove, also sever every other live edge from a tracked owner to the
    /// removed entity, not just the edge that introduced it.
    pub sever_all_incoming: bool,

    /// On commit, replace surviving nodes' relationship snapshot and detach
    /// descriptor with the ones from the fresh walk.
    pub refresh_on_commit: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_tracked: None,
            sever_all_incoming: true,
            refresh_on_commit: true,
        }
    }
}

impl StoreConfig {
    /// Single-edge detach on remove; commit keeps first-insertion snapshots.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_tracked: None,
            sever_all_incoming: false,
            refresh_on_commit: false,
        }
    }

    /// Builder method to set the walk limit.
    #[must_use]
    pub fn with_max_tracked(mut self, limit: usize) -> Self {
        self.max_tracked = Some(limit);
        self
    }

    /// Builder method to set whether remove severs every incoming edge.
    #[must_use]
    pub fn with_sever_all_incoming(mut self, sever: bool) -> Self {
        self.sever_all_incoming = sever;
        self
    }

    /// Builder method to set whether commit refreshes snapshots.
    #[must_use]
    pub fn with_refresh_on_commit(mut self, refresh: bool) -> Self {
        self.refresh_on_commit = refresh;
        self
    }
}

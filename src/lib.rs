//! graphstage - In-memory object-graph staging store
//!
//! This crate re-exports all layers of the graphstage system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: graphstage_store      - Schemas, discovery, walking, the entity store
//! Layer 0: graphstage_foundation - Core types (EntityId, Error)
//! ```

pub use graphstage_foundation as foundation;
pub use graphstage_store as store;

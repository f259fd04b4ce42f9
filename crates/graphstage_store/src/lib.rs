//! Relationship discovery, graph walking, and the entity store for graphstage.
//!
//! This crate provides:
//! - [`Entity`] / [`Schema`] - Per-type description of reference-holding fields
//! - [`EntityHandle`] - Type-erased handle to a tracked instance
//! - [`discover`] / [`Detach`] - Direct relationships and how to sever them
//! - [`Walk`] - Identity-deduplicated traversal from a set of roots
//! - [`EntityStore`] - Flat set of tracked nodes with add/remove/commit/query

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod handle;
pub mod node;
pub mod relationship;
pub mod schema;
pub mod store;
pub mod walk;

pub use config::StoreConfig;
pub use handle::EntityHandle;
pub use node::Node;
pub use relationship::{Detach, DetachKind, Relationship, discover, execute_detach};
pub use schema::{Entity, Schema, SchemaCache, Shared, SlotKind, SlotSchema, shared};
pub use store::{CommitSummary, EntityStore};
pub use walk::Walk;

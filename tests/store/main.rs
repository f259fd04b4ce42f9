//! Integration tests for Layer 1: Store
//!
//! Tests adding, removing, committing and querying object graphs.

mod commit;
mod domain;

//! Integration tests for Layer 0: Foundation
//!
//! Tests entity identity and error types.

mod errors;
mod identity;

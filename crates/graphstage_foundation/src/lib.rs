//! Entity identity and error types for graphstage.
//!
//! This crate provides:
//! - [`EntityId`] - Reference identity of a tracked entity instance
//! - [`Error`] - Error type shared by every graphstage layer
//! - [`StoreLimit`] - Configurable limits that can be exceeded

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;

pub use entity::EntityId;
pub use error::{Error, ErrorKind, Result, StoreLimit};

//! Revision graph engine for schema migrations.
//!
//! Tracks change-sets ("revisions") as a directed acyclic graph, answers head
//! and base queries, resolves symbolic identifiers and walks the graph between
//! two selections in branch-aware order.

pub mod config;
pub mod error;
pub mod map;
pub mod revision;
pub mod selector;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::LineageConfig;
pub use error::{ErrorKind, LineageError, Result};
pub use map::{RevisionIter, RevisionMap};
pub use revision::Revision;
pub use selector::{Identifier, Selection};
pub use source::{ManifestSource, RevisionSource};

//! Testing utilities for revision graphs.
//!
//! Assertion macros plus a handful of ready-made graphs covering the shapes
//! that matter for traversal: forks, merges, several heads and several bases.
//!
//! # Example
//!
//! ```ignore
//! use lineage_core::testing::fixtures;
//!
//! let map = fixtures::diamond();
//! assert_iteration!(map, "d", "a", ["d", "c", "b1", "b2", "a"]);
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;

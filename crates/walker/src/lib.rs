//! Directory-tree ingestion for gazetteer place records
//!
//! This crate provides:
//! - Walker: deterministic filtered traversal of a directory tree
//! - JsonWalker: the same traversal with JSON parsing of selected files
//! - PlaceWalker: full ingestion of a tree of place records into a
//!   [`gazetteer_index::PlaceCollection`]
//! - Error: walker-side error taxonomy wrapping I/O, JSON, and record
//!   validation failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod walker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use walker::{JsonWalker, PlaceWalker, WalkOutcome, Walker};

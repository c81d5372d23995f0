//! Core types for the gazetteer index
//!
//! This crate defines the foundational types used throughout the system:
//! - Place: one validated, immutable place record
//! - DateKey: day-precision key for the last-modified index
//! - Error: error type hierarchy shared by the indexing crates

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod date;
pub mod error;
pub mod record;

// Re-export commonly used types
pub use date::DateKey;
pub use error::{Error, Result};
pub use record::{Place, PLACE_TYPE, TYPE_FIELD};

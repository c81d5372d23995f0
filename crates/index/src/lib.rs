//! Inverted indices over gazetteer place records
//!
//! This crate provides:
//! - normalize: the canonical name-to-token pipeline
//! - PlaceCollection: an append-only record list plus its id, name, word,
//!   and last-modified indices
//! - IndexQuery: the closed query surface over the four index kinds
//! - IndexPolicy: eager or lazy index maintenance, fixed per collection
//!
//! # Usage
//!
//! ```
//! use gazetteer_index::{IndexPolicy, PlaceCollection};
//! use serde_json::json;
//!
//! let mut collection = PlaceCollection::with_policy(IndexPolicy::Lazy);
//! collection.add_json(json!({
//!     "@type": "Place",
//!     "id": "101172",
//!     "title": "Actania",
//!     "created": "2010-09-23T18:13:35Z"
//! }))?;
//!
//! let hits = collection.by_name("actania")?;
//! assert_eq!(hits[0].id(), Some("101172"));
//! # Ok::<(), gazetteer_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
mod extract;
pub mod normalize;
pub mod punct;

// Re-export commonly used types
pub use collection::{combine, IndexPolicy, IndexQuery, PlaceCollection};
pub use normalize::normalize;

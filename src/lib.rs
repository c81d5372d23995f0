//! Gazetteer - in-memory inverted indices over place records
//!
//! A place record is a JSON object tagged `"@type": "Place"`. A
//! [`PlaceCollection`] holds such records and serves exact lookups over four
//! indices: record id, normalized name, words drawn from multi-word names,
//! and last-modified day. Name matching is spelling-tolerant: keys pass
//! through a normalizer that strips punctuation, diacritics, and whitespace
//! before comparison.
//!
//! # Quick Start
//!
//! ```
//! use gazetteer::{IndexPolicy, PlaceCollection};
//! use serde_json::json;
//!
//! let mut places = PlaceCollection::with_policy(IndexPolicy::Lazy);
//! places.add_json(json!({
//!     "@type": "Place",
//!     "id": "423025",
//!     "title": "Roma",
//!     "names": [{"attested": null, "romanized": "Roma, Rome"}],
//!     "created": "2010-09-23T18:13:35Z",
//! }))?;
//!
//! let hits = places.by_name("ROME")?;
//! assert_eq!(hits[0].id(), Some("423025"));
//! # Ok::<(), gazetteer::Error>(())
//! ```
//!
//! # Architecture
//!
//! Three layers, each its own crate:
//!
//! - `gazetteer-core`: the validated [`Place`] record, the error taxonomy,
//!   and [`DateKey`] day handling
//! - `gazetteer-index`: the normalizer and [`PlaceCollection`]
//! - `gazetteer-walker`: directory-tree ingestion of `.json` record files

pub use gazetteer_core::{DateKey, Error, Place, Result, PLACE_TYPE, TYPE_FIELD};
pub use gazetteer_index::{combine, normalize, IndexPolicy, IndexQuery, PlaceCollection};
pub use gazetteer_walker as walker;
pub use gazetteer_walker::{JsonWalker, PlaceWalker, WalkOutcome, Walker};

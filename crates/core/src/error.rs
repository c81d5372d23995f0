//! Error types for the gazetteer index
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for gazetteer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the gazetteer index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Attribute object carries no `@type` discriminator
    #[error("Attribute object has no \"@type\" field")]
    MissingDiscriminator,

    /// `@type` is present but is not the place discriminator
    #[error("Unexpected \"@type\" value {found:?}: expected \"Place\"")]
    TypeMismatch {
        /// The discriminator value actually found, rendered as text
        found: String,
    },

    /// Place construction was handed something other than a JSON object
    #[error("Unsupported place input: expected a JSON object, got {kind}")]
    UnsupportedInput {
        /// JSON kind of the rejected value
        kind: &'static str,
    },

    /// Record carries no string `id` field
    #[error("Record has no string \"id\" field")]
    MissingId,

    /// No modification timestamp could be found anywhere on the record
    #[error("Failed to determine last-modified date for record {id:?}")]
    NoTimestamp {
        /// Identifier of the offending record
        id: String,
    },

    /// A timestamp string was present but could not be parsed
    #[error("Unparseable timestamp {stamp:?} on record {id:?}")]
    BadTimestamp {
        /// Identifier of the offending record
        id: String,
        /// The raw stamp that failed to parse
        stamp: String,
    },

    /// A word-index query value normalized down to nothing
    #[error("Query {raw:?} normalizes to an empty token")]
    EmptyQueryToken {
        /// The raw query value as supplied by the caller
        raw: String,
    },
}

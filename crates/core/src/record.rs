//! Place record model
//!
//! A record wraps one parsed attribute object from a gazetteer file. The
//! wrapper validates the `@type` discriminator up front and then treats the
//! attribute map as opaque, read-only data. Typed accessors expose the
//! handful of fields the index builders rely on; everything else stays
//! reachable through [`Place::data`].

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Name of the discriminator field every attribute object must carry
pub const TYPE_FIELD: &str = "@type";

/// Discriminator value that marks an attribute object as a place
pub const PLACE_TYPE: &str = "Place";

const NO_VALUES: &[Value] = &[];

/// One validated, immutable gazetteer place entry
///
/// ## Invariants
///
/// - The wrapped attribute map always carries `"@type": "Place"`
/// - The map is never mutated after construction; the record owns its copy
///   outright, so later changes to the caller's data cannot reach it
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    data: Map<String, Value>,
}

impl Place {
    /// Validate a parsed JSON value and wrap it as a place
    ///
    /// Fails with [`Error::UnsupportedInput`] when the value is not an
    /// object, with [`Error::MissingDiscriminator`] when the object carries
    /// no `@type` field, and with [`Error::TypeMismatch`] when the
    /// discriminator holds anything other than `"Place"`.
    pub fn new(value: Value) -> Result<Self> {
        let data = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::UnsupportedInput {
                    kind: json_kind(&other),
                })
            }
        };
        match data.get(TYPE_FIELD) {
            None => Err(Error::MissingDiscriminator),
            Some(Value::String(s)) if s == PLACE_TYPE => Ok(Place { data }),
            Some(other) => Err(Error::TypeMismatch {
                found: render_discriminator(other),
            }),
        }
    }

    /// Validate a borrowed attribute map, storing a private copy of it
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Self::new(Value::Object(map.clone()))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Record identifier, when present as a string
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Primary title, possibly `/`-separated alternates; empty when absent
    pub fn title(&self) -> &str {
        self.str_field("title").unwrap_or("")
    }

    /// Prose description; empty when absent
    pub fn description(&self) -> &str {
        self.str_field("description").unwrap_or("")
    }

    /// Canonical URI of the record, when present
    pub fn uri(&self) -> Option<&str> {
        self.str_field("uri")
    }

    /// Creation timestamp of the record itself, when present
    pub fn created(&self) -> Option<&str> {
        self.str_field("created")
    }

    /// Name-objects attached to the record; empty when absent
    pub fn names(&self) -> &[Value] {
        self.list_field("names")
    }

    /// Location-objects attached to the record; empty when absent
    pub fn locations(&self) -> &[Value] {
        self.list_field("locations")
    }

    /// Revision events of the record itself; empty when absent
    pub fn history(&self) -> &[Value] {
        self.list_field("history")
    }

    /// The full underlying attribute map
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    fn list_field(&self, key: &str) -> &[Value] {
        self.data
            .get(key)
            .and_then(Value::as_array)
            .map_or(NO_VALUES, Vec::as_slice)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.uri() {
            Some(uri) => writeln!(f, "{}", uri)?,
            None => writeln!(f, "place {}", self.id().unwrap_or("(no id)"))?,
        }
        writeln!(f, "{}", self.title())?;
        writeln!(f, "{}", self.description())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn render_discriminator(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

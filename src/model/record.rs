//! Record and record identity.
//!
//! A record is an opaque JSON object with a stable `_id`. The core only ever
//! looks at the identity; every other field is display data read through
//! [`Record::field_text`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Field name under which the identity is stored on the wire.
pub const ID_FIELD: &str = "_id";

/// Stable unique identity of a record.
///
/// Deserializes from either a JSON number or a JSON string. Numeric ids order
/// numerically and sort before text ids; text ids order lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Non-negative integer identity.
    Numeric(u64),
    /// Arbitrary string identity.
    Text(String),
}

impl RecordId {
    /// Render the identity the way it is displayed and filtered on.
    pub fn as_text(&self) -> String {
        match self {
            Self::Numeric(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Numeric(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single item of a paginated result set.
///
/// Serialized as a flat JSON object: `{"_id": 7, "badgeType": "Employee"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    id: RecordId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no display fields.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The record identity.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Raw access to a display field. `_id` is not stored here.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display text of a field, `_id` resolving to the identity.
    ///
    /// Strings are returned without quotes, `null` and missing fields as the
    /// empty string, other values as compact JSON.
    pub fn field_text(&self, name: &str) -> String {
        if name == ID_FIELD {
            return self.id.as_text();
        }
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

//! # Entities and Identifiers
//!
//! An [`Entity`] is one record of a resource: an ordered JSON object that must carry
//! an `ID` field. Nothing else about the record is interpreted by the store.
//!
//! ## Identifier Comparison
//!
//! [`EntityId`] is either a JSON number or a JSON string, and comparison is
//! **exact-type**: the number `999` and the string `"999"` are different identifiers.
//! Two numbers compare numerically, so `1` and `1.0` address the same entity.
//!
//! Entities are validated when they cross into the store (see [`Entity::try_from`]).
//! Records already sitting in a resource are not re-validated; a stored record
//! without a usable `ID` simply never matches a lookup.

use crate::error::StoreError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt::{self, Display};

/// Name of the reserved identifier field.
pub const ID_FIELD: &str = "ID";

/// The value of an entity's `ID` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(Number),
    Text(String),
}

impl EntityId {
    /// Reads an identifier out of a JSON value, if it has an identifier type.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Reads the identifier of a stored record.
    pub fn of_record(record: &Value) -> Option<Self> {
        record.get(ID_FIELD).and_then(Self::from_value)
    }

    /// Parses a command-line identifier.
    ///
    /// JSON number and string literals keep their type (`42`, `"42"`); any other
    /// text is taken verbatim as a string identifier.
    pub fn parse_arg(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::Number(n)) => Self::Number(n),
            Ok(Value::String(s)) => Self::Text(s),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// True if `record` is an object whose `ID` equals this identifier.
    pub fn matches(&self, record: &Value) -> bool {
        Self::of_record(record).is_some_and(|id| id == *self)
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

// serde_json numbers are always finite.
impl Eq for EntityId {}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// A validated record: a JSON object with an identifier in its `ID` field.
///
/// Field order is preserved exactly as supplied, so a persisted entity reads back
/// the way it was written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Entity {
    id: EntityId,
    fields: Map<String, Value>,
}

impl Entity {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Map<String, Value>> for Entity {
    type Error = StoreError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match fields.get(ID_FIELD) {
            None => {
                return Err(StoreError::InvalidEntity(format!(
                    "entity is missing the `{ID_FIELD}` field"
                )))
            }
            Some(value) => EntityId::from_value(value).ok_or_else(|| {
                StoreError::InvalidEntity(format!(
                    "`{ID_FIELD}` must be a string or a number, got {value}"
                ))
            })?,
        };
        Ok(Self { id, fields })
    }
}

impl TryFrom<Value> for Entity {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(StoreError::InvalidEntity(format!(
                "entity must be a JSON object, got {other}"
            ))),
        }
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

//! The tagged-tree value type synthesized game code reads and writes.
//!
//! Game state in the original system was a single nested mapping that
//! supported both key and attribute access. Rust has no equivalent of
//! attribute access on an open map, so this reimplements the same shape as
//! an explicit tagged tree: primitives, ordered maps, ordered lists, and a
//! first-class card record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A card is an ordered bag of named fields (rank, suit, whatever a given
/// game needs). It gets its own variant so serialization and equality checks
/// can treat "is this a card" as a type-level question rather than a
/// convention on top of a generic map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Card {
    /// Field values, e.g. `{"rank": "Q", "suit": "spades"}`.
    pub fields: BTreeMap<String, Value>,
}

impl Card {
    /// Builds a card from field pairs.
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Reads a single field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// A primitive, collection, or card node in the game-state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// UTF-8 text.
    Str(String),
    /// A card record.
    Card(Card),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered map of values, keyed by field name.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the value as an `f64`, coercing `Int` and `Bool`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns the value as an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Returns the value as a `bool`, treating any nonzero number as true.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field by name if this value is a `Map` or `Card`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(name),
            Value::Card(c) => c.get(name),
            _ => None,
        }
    }

    /// Returns the underlying list, if this value is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_field_lookup() {
        let card = Card::new([
            ("rank".to_string(), Value::from("Q")),
            ("suit".to_string(), Value::from("spades")),
        ]);
        assert_eq!(card.get("rank"), Some(&Value::Str("Q".to_string())));
        assert_eq!(card.get("missing"), None);
    }

    #[test]
    fn value_coercions() {
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Int(3).as_bool(), Some(true));
        assert_eq!(Value::Float(0.0).as_bool(), Some(false));
    }

    #[test]
    fn map_field_access_matches_card() {
        let card = Value::Card(Card::new([("rank".to_string(), Value::from("A"))]));
        assert_eq!(card.field("rank"), Some(&Value::Str("A".to_string())));
    }
}

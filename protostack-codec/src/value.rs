//! The dynamic value tree decode produces and encode consumes.

use serde::{Deserialize, Serialize};

/// A decoded (or to-be-encoded) value.
///
/// Canonical composite forms:
/// - a record lists every present field in descriptor order; absent
///   optional fields are omitted, repeated fields are always present as a
///   [`Value::List`] (possibly empty)
/// - a tuple lists every element positionally; an absent optional element
///   is [`Value::Null`]
/// - a variant value is a [`Value::Case`]
///
/// `decode(encode(v))` returns `v` for values in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Absent optional tuple element.
    Null,
    Bool(bool),
    /// Platform integer, carried as 64 bits.
    Int(i64),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Double(f64),
    Str(String),
    /// Named-field composite.
    Record(Vec<(String, Value)>),
    /// Positional composite.
    Tuple(Vec<Value>),
    /// Repeated-field sequence, in source order.
    List(Vec<Value>),
    /// Variant case with payload arguments.
    Case { name: String, args: Vec<Value> },
}

impl Value {
    /// A payload-free variant case.
    #[must_use]
    pub fn case(name: impl Into<String>) -> Self {
        Self::Case {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A variant case with payload arguments.
    #[must_use]
    pub fn case_with(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Case {
            name: name.into(),
            args,
        }
    }

    /// Looks up a record field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

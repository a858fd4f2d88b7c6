//! The neutral value tree and the kinds that describe it.

use std::collections::HashMap;
use std::fmt;

/// Identity token of an object that lives in the remote runtime.
///
/// Issued by the remote side and opaque to the host. Two ids are the same
/// object exactly when their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A value as it crosses the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Ref(ObjectId),
    Array(Vec<Value>),
    /// String-keyed; entry order is not preserved.
    Map(HashMap<String, Value>),
}

impl Value {
    /// The narrowest kind that decodes this value back unchanged.
    ///
    /// Containers whose elements disagree (or that are empty) get `Any` as
    /// their element kind.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::Ref(_) => Kind::Ref,
            Value::Array(items) => Kind::Array(Box::new(common_kind(items.iter()))),
            Value::Map(entries) => Kind::Map(Box::new(common_kind(entries.values()))),
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::Ref(id) => Some(id),
            _ => None,
        }
    }
}

fn common_kind<'a>(mut values: impl Iterator<Item = &'a Value>) -> Kind {
    let Some(first) = values.next().map(Value::kind) else { return Kind::Any };
    if values.all(|v| v.kind() == first) { first } else { Kind::Any }
}

/// The shape a decoder expects at a given position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Ref,
    Array(Box<Kind>),
    Map(Box<Kind>),
    /// Accepts whatever arrives.
    Any,
}

impl Kind {
    pub fn array(of: Kind) -> Self {
        Kind::Array(Box::new(of))
    }

    pub fn map(of: Kind) -> Self {
        Kind::Map(Box::new(of))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => f.write_str("null"),
            Kind::Bool => f.write_str("bool"),
            Kind::Int => f.write_str("int"),
            Kind::Long => f.write_str("long"),
            Kind::Float => f.write_str("float"),
            Kind::Double => f.write_str("double"),
            Kind::String => f.write_str("string"),
            Kind::Ref => f.write_str("ref"),
            Kind::Array(inner) => write!(f, "array<{}>", inner),
            Kind::Map(inner) => write!(f, "map<string, {}>", inner),
            Kind::Any => f.write_str("any"),
        }
    }
}

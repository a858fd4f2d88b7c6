//! # Host Type Conversions
//!
//! Moves host values into the neutral [`Value`] tree and back. Conversions
//! back are strict: a value of the wrong kind is a `TypeMismatch`, never a
//! best-effort cast.

use std::collections::HashMap;
use std::hash::BuildHasher;

use wirerpc::Kind;
use wirerpc::ObjectId;
use wirerpc::Value;

use crate::error::Error;
use crate::error::Result;

/// Host values that can be sent as call arguments.
pub trait IntoWire {
    fn into_wire(self) -> Value;
}

/// Host values that can be rebuilt from a reply.
pub trait FromWire: Sized {
    /// The kind the reply is decoded against.
    fn kind() -> Kind;

    fn from_wire(value: Value) -> Result<Self>;
}

/// What a generated setter accepts for a parameter of type `T`.
///
/// Only the value itself, plus `&str` for `String`. A wider conversion such
/// as `Into<T>` leaves integer literals without a type and they fall back to
/// `i32`.
pub trait IntoParam<T> {
    fn into_param(self) -> T;
}

impl<T> IntoParam<T> for T {
    fn into_param(self) -> T {
        self
    }
}

impl IntoParam<String> for &str {
    fn into_param(self) -> String {
        self.to_string()
    }
}

fn mismatch<T: FromWire>(found: &Value) -> Error {
    Error::TypeMismatch { expected: T::kind(), found: found.kind().to_string() }
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident, $kind:ident;)*) => {
        $(
            impl IntoWire for $ty {
                fn into_wire(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl FromWire for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }

                fn from_wire(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => Bool, Bool;
    i32 => Int, Int;
    i64 => Long, Long;
    f32 => Float, Float;
    f64 => Double, Double;
    String => String, String;
    ObjectId => Ref, Ref;
}

impl IntoWire for &str {
    fn into_wire(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoWire for Value {
    fn into_wire(self) -> Value {
        self
    }
}

/// Accepts anything; used for parameters the remote side types as `Object`.
impl FromWire for Value {
    fn kind() -> Kind {
        Kind::Any
    }

    fn from_wire(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// Methods returning `void` reply with `null`.
impl FromWire for () {
    fn kind() -> Kind {
        Kind::Null
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: IntoWire> IntoWire for Vec<T> {
    fn into_wire(self) -> Value {
        Value::Array(self.into_iter().map(IntoWire::into_wire).collect())
    }
}

impl<T: IntoWire + Clone> IntoWire for &[T] {
    fn into_wire(self) -> Value {
        Value::Array(self.iter().cloned().map(IntoWire::into_wire).collect())
    }
}

impl<T: FromWire> FromWire for Vec<T> {
    fn kind() -> Kind {
        Kind::array(T::kind())
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_wire).collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: IntoWire, S: BuildHasher> IntoWire for HashMap<String, T, S> {
    fn into_wire(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_wire())).collect())
    }
}

impl<T: FromWire> FromWire for HashMap<String, T> {
    fn kind() -> Kind {
        Kind::map(T::kind())
    }

    fn from_wire(value: Value) -> Result<Self> {
        let Value::Map(entries) = value else {
            return Err(mismatch::<Self>(&value));
        };
        let mut out = HashMap::with_capacity(entries.len());
        for (key, item) in entries {
            out.insert(key, T::from_wire(item)?);
        }
        Ok(out)
    }
}

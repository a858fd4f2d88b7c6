//! # Codec
//!
//! The translation layer between [`Value`] and the Wirepack wire format.
//!
//! ## Invariants
//! - **Recursion Safety**: All recursive operations are bounded by `MAX_RECURSION_DEPTH`.
//! - **Kind Strictness**: Decoding checks every wire tag against the expected [`Kind`].
//!   Nothing is widened or coerced; an `i32` on the wire is not a `long`.

use std::collections::HashMap;

use crate::error::Error;
use crate::error::Result;
use crate::value::Kind;
use crate::value::ObjectId;
use crate::value::Value;

use wirepack::Decoder;
use wirepack::Encoder;
use wirepack::Tag;

/// The maximum nesting depth for values before giving up.
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Encodes a [`Value`] into the encoder stream.
///
/// # Errors
/// Returns `Error::RecursionLimitExceeded` if the value is too deeply nested.
pub fn encode_value(enc: &mut Encoder, value: &Value) -> Result<()> {
    encode_value_impl(enc, value, 0)
}

fn encode_value_impl(enc: &mut Encoder, value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded);
    }

    match value {
        Value::Null => enc.null()?,
        Value::Bool(b) => enc.bool(*b)?,
        Value::Int(v) => enc.i32(*v)?,
        Value::Long(v) => enc.i64(*v)?,
        Value::Float(v) => enc.f32(*v)?,
        Value::Double(v) => enc.f64(*v)?,
        Value::String(s) => enc.str(s)?,
        Value::Ref(id) => enc.reference(id.as_str())?,
        Value::Array(items) => enc.list(|enc| -> Result<()> {
            for item in items {
                encode_value_impl(enc, item, depth + 1)?;
            }
            Ok(())
        })?,
        Value::Map(entries) => enc.map(|enc| -> Result<()> {
            for (key, item) in entries {
                enc.entry(key, |enc| encode_value_impl(enc, item, depth + 1))?;
            }
            Ok(())
        })?,
    }
    Ok(())
}

/// Decodes a single value, checking it against the expected [`Kind`].
pub fn decode_value(dec: &mut Decoder, kind: &Kind) -> Result<Value> {
    decode_value_impl(dec, kind, 0)
}

fn decode_value_impl(dec: &mut Decoder, kind: &Kind, depth: usize) -> Result<Value> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded);
    }

    let tag = dec.peek_tag()?;
    match (kind, tag) {
        (Kind::Any, _) => decode_any(dec, tag, depth),

        (Kind::Null, Tag::Null) => {
            dec.null()?;
            Ok(Value::Null)
        }
        (Kind::Bool, Tag::True | Tag::False) => Ok(Value::Bool(dec.bool()?)),
        (Kind::Int, Tag::I32) => Ok(Value::Int(dec.i32()?)),
        (Kind::Long, Tag::I64) => Ok(Value::Long(dec.i64()?)),
        (Kind::Float, Tag::F32) => Ok(Value::Float(dec.f32()?)),
        (Kind::Double, Tag::F64) => Ok(Value::Double(dec.f64()?)),
        (Kind::String, Tag::Str) => Ok(Value::String(dec.str()?.to_string())),
        (Kind::Ref, Tag::Ref) => Ok(Value::Ref(ObjectId::from(dec.reference()?))),

        (Kind::Array(inner), Tag::List) => {
            let mut items = Vec::new();
            for item in dec.list()? {
                let mut item = item?;
                items.push(decode_value_impl(&mut item, inner, depth + 1)?);
                item.finish()?;
            }
            Ok(Value::Array(items))
        }

        (Kind::Map(inner), Tag::Map) => {
            let mut entries = HashMap::new();
            for entry in dec.map()? {
                let (key, mut payload) = entry?;
                let item = decode_value_impl(&mut payload, inner, depth + 1)?;
                payload.finish()?;
                if entries.insert(key.to_string(), item).is_some() {
                    return Err(Error::ProtocolViolation(format!("duplicate map key `{}`", key)));
                }
            }
            Ok(Value::Map(entries))
        }

        (expected, found) => Err(Error::TypeMismatch {
            expected: expected.clone(),
            found: found.name().to_string(),
        }),
    }
}

/// Decodes whatever the next tag says, recursing with `Any`.
fn decode_any(dec: &mut Decoder, tag: Tag, depth: usize) -> Result<Value> {
    let kind = match tag {
        Tag::Null => Kind::Null,
        Tag::True | Tag::False => Kind::Bool,
        Tag::I32 => Kind::Int,
        Tag::I64 => Kind::Long,
        Tag::F32 => Kind::Float,
        Tag::F64 => Kind::Double,
        Tag::Str => Kind::String,
        Tag::Ref => Kind::Ref,
        Tag::List => Kind::array(Kind::Any),
        Tag::Map => Kind::map(Kind::Any),
        Tag::Entry | Tag::Ok | Tag::Err => {
            return Err(Error::TypeMismatch { expected: Kind::Any, found: tag.name().to_string() });
        }
    };
    decode_value_impl(dec, &kind, depth)
}

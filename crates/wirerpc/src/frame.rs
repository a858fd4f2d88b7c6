//! # Protocol Frames
//!
//! Defines the structure of the call envelope (Call vs Reply).
//!
//! ```text
//! Entry("Call",  Map { seq: i64, target: Entry("Object", Ref) | Entry("Class", Str),
//!                      method: Str, args: List })
//! Entry("Reply", Ok(Map  { seq: i64, value: <any> }))
//! Entry("Reply", Err(Map { seq: i64, fault: Entry("Exception", Map { type, message })
//!                                         | Entry("ObjectNotFound", Ref) }))
//! ```
//!
//! ## Invariants
//! - **Panic Safety**: All decoding paths return `Result`, never panicking on unknown data.
//! - **Forward Compatibility**: Unknown map fields are skipped.

use std::fmt;

use crate::codec::decode_value;
use crate::codec::encode_value;
use crate::error::Error;
use crate::error::Result;
use crate::value::Kind;
use crate::value::ObjectId;
use crate::value::Value;

use wirepack::Decoder;
use wirepack::Encoder;

/// What a call is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// An instance method on a live remote object.
    Object(ObjectId),
    /// A static method, scoped by the fully-qualified remote class name.
    Class(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Object(id) => write!(f, "object {}", id),
            Target::Class(name) => write!(f, "class {}", name),
        }
    }
}

/// Why the remote side refused or failed a call (the `Err` side of a Reply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The remote method threw.
    Exception { type_name: String, message: String },
    /// The target id does not name a live object.
    ObjectNotFound(ObjectId),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Exception { type_name, message } => write!(f, "{}: {}", type_name, message),
            Fault::ObjectNotFound(id) => write!(f, "no remote object with id {}", id),
        }
    }
}

/// Encodes an outbound Call frame.
pub struct CallEncoder<'a> {
    pub seq: i64,
    pub target: &'a Target,
    pub method: &'a str,
    pub args: &'a [Value],
}

impl<'a> CallEncoder<'a> {
    pub fn new(seq: i64, target: &'a Target, method: &'a str, args: &'a [Value]) -> Self {
        Self { seq, target, method, args }
    }

    /// Encode this call into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.entry("Call", |enc| {
            enc.map(|enc| -> Result<()> {
                write_i64(enc, "seq", self.seq)?;
                enc.entry("target", |enc| encode_target(enc, self.target))?;
                write_str(enc, "method", self.method)?;
                enc.entry("args", |enc| {
                    enc.list(|enc| -> Result<()> {
                        for arg in self.args {
                            encode_value(enc, arg)?;
                        }
                        Ok(())
                    })
                })
            })
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes()?)
    }
}

/// Decodes an inbound Call frame.
///
/// **Invariant**: The `args` decoder points to a List container holding the arguments.
pub struct CallDecoder<'a> {
    pub seq: i64,
    pub target: Target,
    pub method: &'a str,
    pub args: Decoder<'a>,
}

impl<'a> CallDecoder<'a> {
    /// Decode a Call frame body.
    pub fn decode(mut dec: Decoder<'a>) -> Result<Self> {
        let mut seq = None;
        let mut target = None;
        let mut method = None;
        let mut args = None;

        for entry in dec.map()? {
            let (key, mut val) = entry?;
            match key {
                "seq" => seq = Some(val.i64()?),
                "target" => target = Some(decode_target(&mut val)?),
                "method" => method = Some(val.str()?),
                "args" => args = Some(val),
                _ => val.skip()?,
            }
        }

        Ok(CallDecoder {
            seq: seq.ok_or(Error::MissingField("seq"))?,
            target: target.ok_or(Error::MissingField("target"))?,
            method: method.ok_or(Error::MissingField("method"))?,
            args: args.ok_or(Error::MissingField("args"))?,
        })
    }

    /// Decodes every argument without expectations about its kind.
    pub fn decode_args(&self) -> Result<Vec<Value>> {
        let mut args = self.args.clone();
        let mut values = Vec::new();
        for item in args.list()? {
            let mut item = item?;
            values.push(decode_value(&mut item, &Kind::Any)?);
        }
        Ok(values)
    }
}

/// Encodes an outbound Reply frame (success).
pub struct ReplyOkEncoder<'a> {
    pub seq: i64,
    pub value: &'a Value,
}

impl<'a> ReplyOkEncoder<'a> {
    pub fn new(seq: i64, value: &'a Value) -> Self {
        Self { seq, value }
    }

    /// Encode this success reply into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.entry("Reply", |enc| {
            enc.ok(|enc| {
                enc.map(|enc| -> Result<()> {
                    write_i64(enc, "seq", self.seq)?;
                    enc.entry("value", |enc| encode_value(enc, self.value))
                })
            })
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes()?)
    }
}

/// Encodes an outbound Reply frame (failure).
pub struct ReplyErrEncoder<'a> {
    pub seq: i64,
    pub fault: &'a Fault,
}

impl<'a> ReplyErrEncoder<'a> {
    pub fn new(seq: i64, fault: &'a Fault) -> Self {
        Self { seq, fault }
    }

    /// Encode this failure reply into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.entry("Reply", |enc| {
            enc.err(|enc| {
                enc.map(|enc| -> Result<()> {
                    write_i64(enc, "seq", self.seq)?;
                    enc.entry("fault", |enc| encode_fault(enc, self.fault))
                })
            })
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes()?)
    }
}

/// Decodes an inbound Reply frame.
pub struct ReplyDecoder<'a> {
    pub seq: i64,
    /// The outcome of the call.
    /// - `Ok(Decoder)`: Success. Points to the single returned item.
    /// - `Err(Fault)`: The remote side failed the call.
    pub status: std::result::Result<Decoder<'a>, Fault>,
}

impl<'a> ReplyDecoder<'a> {
    /// Decode a Reply frame body.
    pub fn decode(mut dec: Decoder<'a>) -> Result<Self> {
        match dec.outcome()? {
            Ok(body) => Self::decode_success(body),
            Err(body) => Self::decode_failure(body),
        }
    }

    fn decode_success(mut body: Decoder<'a>) -> Result<Self> {
        let mut seq = None;
        let mut value = None;

        for entry in body.map()? {
            let (key, mut val) = entry?;
            match key {
                "seq" => seq = Some(val.i64()?),
                "value" => value = Some(val),
                _ => val.skip()?,
            }
        }

        Ok(ReplyDecoder {
            seq: seq.ok_or(Error::MissingField("seq"))?,
            status: Ok(value.ok_or(Error::MissingField("value"))?),
        })
    }

    fn decode_failure(mut body: Decoder<'a>) -> Result<Self> {
        let mut seq = None;
        let mut fault = None;

        for entry in body.map()? {
            let (key, mut val) = entry?;
            match key {
                "seq" => seq = Some(val.i64()?),
                "fault" => fault = Some(decode_fault(&mut val)?),
                _ => val.skip()?,
            }
        }

        Ok(ReplyDecoder {
            seq: seq.ok_or(Error::MissingField("seq"))?,
            status: Err(fault.ok_or(Error::MissingField("fault"))?),
        })
    }
}

/// Top-level frame decoder.
pub enum RpcFrame<'a> {
    Call(CallDecoder<'a>),
    Reply(ReplyDecoder<'a>),
}

impl<'a> RpcFrame<'a> {
    /// Decode a frame from the decoder.
    pub fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let (kind, body) = dec.entry()?;
        match kind {
            "Call" => Ok(RpcFrame::Call(CallDecoder::decode(body)?)),
            "Reply" => Ok(RpcFrame::Reply(ReplyDecoder::decode(body)?)),
            other => Err(Error::UnknownVariant(format!("top-level frame `{}`", other))),
        }
    }
}

/// Decodes just the sequence number from a raw frame.
///
/// Lets a caller report which call a reply belongs to even when the rest of
/// the frame does not decode.
pub fn decode_seq(bytes: &[u8]) -> Result<i64> {
    let mut dec = Decoder::new(bytes);
    let (kind, mut body) = dec.entry()?;
    let map = match kind {
        "Call" => body.map()?,
        "Reply" => match body.outcome()? {
            Ok(mut ok) => ok.map()?,
            Err(mut err) => err.map()?,
        },
        other => return Err(Error::UnknownVariant(format!("top-level frame `{}`", other))),
    };

    for entry in map {
        let (key, mut val) = entry?;
        if key == "seq" {
            return Ok(val.i64()?);
        }
    }

    Err(Error::MissingField("seq"))
}

// Helper functions

fn write_i64(enc: &mut Encoder, key: &str, val: i64) -> Result<()> {
    enc.entry(key, |enc| enc.i64(val))?;
    Ok(())
}

fn write_str(enc: &mut Encoder, key: &str, val: &str) -> Result<()> {
    enc.entry(key, |enc| enc.str(val))?;
    Ok(())
}

fn encode_target(enc: &mut Encoder, target: &Target) -> Result<()> {
    match target {
        Target::Object(id) => enc.entry("Object", |enc| enc.reference(id.as_str()))?,
        Target::Class(name) => enc.entry("Class", |enc| enc.str(name))?,
    }
    Ok(())
}

fn decode_target(dec: &mut Decoder) -> Result<Target> {
    let (kind, mut payload) = dec.entry()?;
    match kind {
        "Object" => Ok(Target::Object(ObjectId::from(payload.reference()?))),
        "Class" => Ok(Target::Class(payload.str()?.to_string())),
        other => Err(Error::UnknownVariant(format!("call target `{}`", other))),
    }
}

fn encode_fault(enc: &mut Encoder, fault: &Fault) -> Result<()> {
    match fault {
        Fault::Exception { type_name, message } => enc.entry("Exception", |enc| {
            enc.map(|enc| -> Result<()> {
                write_str(enc, "type", type_name)?;
                write_str(enc, "message", message)
            })
        })?,
        Fault::ObjectNotFound(id) => enc.entry("ObjectNotFound", |enc| enc.reference(id.as_str()))?,
    }
    Ok(())
}

fn decode_fault(dec: &mut Decoder) -> Result<Fault> {
    let (kind, mut payload) = dec.entry()?;
    match kind {
        "Exception" => {
            let mut type_name = None;
            let mut message = None;
            for entry in payload.map()? {
                let (key, mut val) = entry?;
                match key {
                    "type" => type_name = Some(val.str()?.to_string()),
                    "message" => message = Some(val.str()?.to_string()),
                    _ => val.skip()?,
                }
            }
            Ok(Fault::Exception {
                type_name: type_name.ok_or(Error::MissingField("type"))?,
                message: message.ok_or(Error::MissingField("message"))?,
            })
        }
        "ObjectNotFound" => Ok(Fault::ObjectNotFound(ObjectId::from(payload.reference()?))),
        other => Err(Error::UnknownVariant(format!("fault `{}`", other))),
    }
}

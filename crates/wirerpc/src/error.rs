//! # Error Definitions
//!
//! Protocol-level failures. Faults raised by the remote runtime are not
//! errors here; they travel inside a `Reply` as a [`Fault`](crate::Fault).

use crate::value::Kind;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The underlying Wirepack encoding or decoding failed.
    Pack(wirepack::Error),
    /// The wire shape did not match the expected kind.
    TypeMismatch { expected: Kind, found: String },
    /// A frame was missing a required field.
    MissingField(&'static str),
    /// An unknown frame, target or fault variant was encountered.
    UnknownVariant(String),
    /// The frame was well-formed but broke the call protocol (e.g. sequence mismatch).
    ProtocolViolation(String),
    /// The nested depth of a value exceeded the safety limit.
    RecursionLimitExceeded,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Pack(e) => write!(f, "wire format: {}", e),
            Error::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Error::MissingField(name) => write!(f, "frame is missing `{}`", name),
            Error::UnknownVariant(name) => write!(f, "unknown variant `{}`", name),
            Error::ProtocolViolation(msg) => write!(f, "protocol violation: {}", msg),
            Error::RecursionLimitExceeded => write!(f, "value nesting exceeds the recursion limit"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pack(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wirepack::Error> for Error {
    fn from(e: wirepack::Error) -> Self {
        Self::Pack(e)
    }
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

//! # Error Definitions
//!
//! Every failure a bridge call can end in, and the coarse [`ErrorKind`]
//! callers branch on.

use std::fmt;

use wirerpc::Fault;
use wirerpc::Kind;
use wirerpc::ObjectId;

use crate::resolve::Capability;
use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The bytes could not be moved (disconnect, closed session, oversized frame).
    Transport(TransportError),
    /// The bytes moved but did not form a valid exchange.
    Protocol(wirerpc::Error),
    /// The remote runtime has no object for this id, typically because the
    /// session that issued it has ended.
    StaleReference(ObjectId),
    /// The remote method threw. Carried verbatim.
    Remote { type_name: String, message: String },
    /// A reply did not have the kind the caller declared.
    TypeMismatch { expected: Kind, found: String },
    /// A returned object's class is not registered for the requested capability.
    UnsupportedRemoteType { capability: Capability, class_name: String },
    /// Connection settings could not be read.
    InvalidConfig(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The channel failed; no remote-side meaning can be attached.
    Channel,
    /// The remote side raised an exception.
    Remote,
    TypeMismatch,
    UnsupportedRemoteType,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::Protocol(_) | Error::StaleReference(_) => ErrorKind::Channel,
            Error::Remote { .. } => ErrorKind::Remote,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::UnsupportedRemoteType { .. } => ErrorKind::UnsupportedRemoteType,
            Error::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport failure: {}", e),
            Self::Protocol(e) => write!(f, "Protocol error: {}", e),
            Self::StaleReference(id) => write!(f, "Stale reference: remote has no object {}", id),
            Self::Remote { type_name, message } => write!(f, "Remote exception {}: {}", type_name, message),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::UnsupportedRemoteType { capability, class_name } => {
                write!(f, "Unsupported remote type {} for capability {}", class_name, capability)
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<wirerpc::Error> for Error {
    fn from(e: wirerpc::Error) -> Self {
        match e {
            wirerpc::Error::TypeMismatch { expected, found } => Self::TypeMismatch { expected, found },
            other => Self::Protocol(other),
        }
    }
}

impl From<wirepack::Error> for Error {
    fn from(e: wirepack::Error) -> Self {
        Self::Protocol(wirerpc::Error::Pack(e))
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Exception { type_name, message } => Self::Remote { type_name, message },
            Fault::ObjectNotFound(id) => Self::StaleReference(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! # Transport Abstraction
//!
//! A minimal, async interface for moving bytes to the remote runtime.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: The Transport knows nothing about frames, values or kinds.
//!   It moves opaque buffers.
//! - **Request-Response**: The only interaction is "send bytes, await bytes".

use std::fmt;

/// Errors that occur at the network/transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// A message exceeded the configured frame limit.
    PayloadTooLarge { len: usize, max: usize },
    /// Generic I/O error or internal transport failure.
    Io(String),
    /// The session was closed locally.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::PayloadTooLarge { len, max } => {
                write!(f, "Payload of {} bytes exceeds the {} byte frame limit", len, max)
            }
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Closed => write!(f, "Session is closed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => Self::ConnectionLost(e.to_string()),
            _ => Self::Io(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// A mechanism to send a byte buffer and receive a reply.
///
/// This trait is object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a payload and waits for the reply bytes.
    ///
    /// Must not interpret the payload.
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

use crate::encoder::Scope;
use crate::tag::Tag;

/// Encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer exhausted while reading.
    UnexpectedEnd,
    /// Byte does not correspond to any `Tag`.
    InvalidTag(u8),
    /// A valid tag, but not the one the reader asked for.
    WrongTag { expected: Tag, found: Tag },
    /// String or reference bytes are not valid UTF-8.
    InvalidUtf8,
    /// Blob or container body exceeds `u32::MAX`.
    BlobTooLarge(usize),
    /// Bytes left over after a complete item.
    TrailingBytes(usize),
    /// Closing a scope that is not the innermost open scope.
    ScopeMismatch { expected: Scope, actual: Scope },
    /// Closing a scope when none is open.
    ScopeUnderflow,
    /// Finalizing with scopes still open.
    ScopeStillOpen,
    /// A second item written into an `Entry`, `Ok` or `Err`.
    TooManyItems(Scope),
    /// An `Entry`, `Ok` or `Err` closed without its payload.
    EmptyScope(Scope),
    /// Something other than an `Entry` written directly into a `Map`.
    InvalidMapItem(Tag),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnexpectedEnd => write!(f, "unexpected end of input"),
            Error::InvalidTag(b) => write!(f, "invalid tag byte {:#04x}", b),
            Error::WrongTag { expected, found } => write!(f, "expected {}, found {}", expected, found),
            Error::InvalidUtf8 => write!(f, "invalid utf-8"),
            Error::BlobTooLarge(len) => write!(f, "body of {} bytes exceeds the u32 length prefix", len),
            Error::TrailingBytes(n) => write!(f, "{} trailing bytes after item", n),
            Error::ScopeMismatch { expected, actual } => {
                write!(f, "scope mismatch: closing {:?} while {:?} is open", expected, actual)
            }
            Error::ScopeUnderflow => write!(f, "no open scope to close"),
            Error::ScopeStillOpen => write!(f, "scopes still open"),
            Error::TooManyItems(s) => write!(f, "{:?} scope holds exactly one item", s),
            Error::EmptyScope(s) => write!(f, "{:?} scope closed without an item", s),
            Error::InvalidMapItem(tag) => write!(f, "map bodies hold entries only, got {}", tag),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for wirepack operations.
pub type Result<T> = std::result::Result<T, Error>;

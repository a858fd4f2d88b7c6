//! Scope-tracking encoder.

use crate::error::Error;
use crate::error::Result;
use crate::tag::Tag;

/// An open container on the encoder stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Ordered sequence; allows any number of items.
    List,
    /// Key-value container; allows only `Entry` items.
    Map,
    /// Named payload; exactly one item after the name.
    Entry,
    /// `Ok` or `Err` wrapper; exactly one item.
    Outcome,
}

struct Frame {
    /// Offset of the first body byte; the length prefix sits just before it.
    start: usize,
    scope: Scope,
    count: usize,
}

/// Generates the fixed-width little-endian writers.
macro_rules! fixed_writers {
    ($($name:ident: $ty:ty => $tag:ident;)*) => {
        $(
            #[doc = concat!("Encodes a `", stringify!($ty), "` (LE).")]
            pub fn $name(&mut self, v: $ty) -> Result<()> {
                self.write_tag(Tag::$tag)?;
                self.buf.extend_from_slice(&v.to_le_bytes());
                self.item_written();
                Ok(())
            }
        )*
    };
}

/// A bounded, state-machine driven encoder.
///
/// Containers are written through closures (`list`, `map`, `entry`, `ok`, `err`);
/// the scope is opened before the closure runs and closed after it returns, with
/// the length header back-patched on close.
///
/// # Structural Invariants
///
/// 1. **Map scopes** accept only `Entry` items.
/// 2. **Entry and Outcome scopes** accept exactly one item.
/// 3. `into_bytes` fails while any scope is still open, which is the state an
///    encoder is left in when a closure bails out early.
pub struct Encoder {
    buf: Vec<u8>,
    /// Open containers only; empty at the top level.
    stack: Vec<Frame>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
            stack: Vec::with_capacity(8),
        }
    }

    /// Consumes the encoder and returns the finished bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(Error::ScopeStillOpen);
        }
        Ok(self.buf)
    }

    fn admit(&self, tag: Tag) -> Result<()> {
        let Some(frame) = self.stack.last() else { return Ok(()) };
        match frame.scope {
            Scope::List => Ok(()),
            Scope::Map if tag != Tag::Entry => Err(Error::InvalidMapItem(tag)),
            Scope::Map => Ok(()),
            Scope::Entry | Scope::Outcome if frame.count >= 1 => Err(Error::TooManyItems(frame.scope)),
            Scope::Entry | Scope::Outcome => Ok(()),
        }
    }

    fn item_written(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.count += 1;
        }
    }

    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.admit(tag)?;
        self.buf.push(tag as u8);
        Ok(())
    }

    fn blob(&mut self, tag: Tag, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| Error::BlobTooLarge(bytes.len()))?;
        self.write_tag(tag)?;
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(bytes);
        self.item_written();
        Ok(())
    }

    fn open(&mut self, tag: Tag, scope: Scope) -> Result<()> {
        self.write_tag(tag)?;
        self.buf.extend_from_slice(&[0; 4]);
        self.stack.push(Frame { start: self.buf.len(), scope, count: 0 });
        Ok(())
    }

    fn close(&mut self, expected: Scope) -> Result<()> {
        let Some(frame) = self.stack.last() else { return Err(Error::ScopeUnderflow) };
        if frame.scope != expected {
            return Err(Error::ScopeMismatch { expected, actual: frame.scope });
        }
        if matches!(frame.scope, Scope::Entry | Scope::Outcome) && frame.count == 0 {
            return Err(Error::EmptyScope(frame.scope));
        }

        let start = frame.start;
        let body_len = self.buf.len() - start;
        let len = u32::try_from(body_len).map_err(|_| Error::BlobTooLarge(body_len))?;
        self.buf[start - 4..start].copy_from_slice(&len.to_le_bytes());
        self.stack.pop();
        self.item_written();
        Ok(())
    }

    fn scoped<E, F>(&mut self, tag: Tag, scope: Scope, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.open(tag, scope)?;
        body(self)?;
        self.close(scope)?;
        Ok(())
    }

    /// Encodes `null`.
    pub fn null(&mut self) -> Result<()> {
        self.write_tag(Tag::Null)?;
        self.item_written();
        Ok(())
    }

    /// Encodes a boolean as a bare tag.
    pub fn bool(&mut self, v: bool) -> Result<()> {
        self.write_tag(if v { Tag::True } else { Tag::False })?;
        self.item_written();
        Ok(())
    }

    fixed_writers! {
        i32: i32 => I32;
        i64: i64 => I64;
        f32: f32 => F32;
        f64: f64 => F64;
    }

    /// Encodes a UTF-8 string blob.
    pub fn str(&mut self, v: &str) -> Result<()> {
        self.blob(Tag::Str, v.as_bytes())
    }

    /// Encodes a remote object identity.
    pub fn reference(&mut self, id: &str) -> Result<()> {
        self.blob(Tag::Ref, id.as_bytes())
    }

    /// Writes a List container whose items are produced by `body`.
    pub fn list<E, F>(&mut self, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.scoped(Tag::List, Scope::List, body)
    }

    /// Writes a Map container. `body` may only write entries.
    pub fn map<E, F>(&mut self, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.scoped(Tag::Map, Scope::Map, body)
    }

    /// Writes a named payload. `body` must write exactly one item.
    pub fn entry<E, F>(&mut self, name: &str, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.scoped(Tag::Entry, Scope::Entry, |enc| {
            enc.str(name)?;
            // The name is metadata; the payload slot is still free.
            if let Some(frame) = enc.stack.last_mut() {
                frame.count = 0;
            }
            body(enc)
        })
    }

    /// Writes an `Ok` wrapper around exactly one item.
    pub fn ok<E, F>(&mut self, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.scoped(Tag::Ok, Scope::Outcome, body)
    }

    /// Writes an `Err` wrapper around exactly one item.
    pub fn err<E, F>(&mut self, body: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        self.scoped(Tag::Err, Scope::Outcome, body)
    }
}

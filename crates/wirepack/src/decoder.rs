//! Zero-copy, bounds-checked reader.

use crate::error::Error;
use crate::error::Result;
use crate::tag::Body;
use crate::tag::Tag;

/// Generates the fixed-width little-endian readers.
macro_rules! fixed_readers {
    ($($name:ident: $ty:ty => $tag:ident;)*) => {
        $(
            #[doc = concat!("Decodes a `", stringify!($ty), "` (LE).")]
            pub fn $name(&mut self) -> Result<$ty> {
                self.expect(Tag::$tag)?;
                Ok(<$ty>::from_le_bytes(self.take_array()?))
            }
        )*
    };
}

/// A view over an encoded byte slice.
///
/// Reading advances the view. Container reads hand back new decoders restricted
/// to the container's body, so a malformed child can never read past its parent.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes left in the view.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Fails with `TrailingBytes` unless the view is fully consumed.
    pub fn finish(&self) -> Result<()> {
        match self.buf.len() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    /// Peeks the next tag without advancing.
    pub fn peek_tag(&self) -> Result<Tag> {
        let &b = self.buf.first().ok_or(Error::UnexpectedEnd)?;
        Tag::from_u8(b).ok_or(Error::InvalidTag(b))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::UnexpectedEnd);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        <[u8; N]>::try_from(self.take(N)?).map_err(|_| Error::UnexpectedEnd)
    }

    fn length(&mut self) -> Result<usize> {
        Ok(u32::from_le_bytes(self.take_array()?) as usize)
    }

    fn expect(&mut self, expected: Tag) -> Result<()> {
        let found = self.peek_tag()?;
        if found != expected {
            return Err(Error::WrongTag { expected, found });
        }
        self.take(1)?;
        Ok(())
    }

    fn enter(&mut self, tag: Tag) -> Result<Decoder<'a>> {
        self.expect(tag)?;
        let len = self.length()?;
        Ok(Decoder::new(self.take(len)?))
    }

    /// Skips the next item, including everything nested inside it.
    pub fn skip(&mut self) -> Result<()> {
        let tag = self.peek_tag()?;
        self.take(1)?;
        match tag.body() {
            Body::Fixed(n) => self.take(n).map(drop),
            Body::Prefixed => {
                let len = self.length()?;
                self.take(len).map(drop)
            }
        }
    }

    /// Splits the next complete item off into its own decoder.
    pub fn split_item(&mut self) -> Result<Decoder<'a>> {
        let mut probe = self.clone();
        probe.skip()?;
        let len = self.remaining() - probe.remaining();
        Ok(Decoder::new(self.take(len)?))
    }

    /// Decodes `null`.
    pub fn null(&mut self) -> Result<()> {
        self.expect(Tag::Null)
    }

    /// Decodes a bool.
    pub fn bool(&mut self) -> Result<bool> {
        match self.peek_tag()? {
            Tag::True => {
                self.take(1)?;
                Ok(true)
            }
            Tag::False => {
                self.take(1)?;
                Ok(false)
            }
            found => Err(Error::WrongTag { expected: Tag::True, found }),
        }
    }

    fixed_readers! {
        i32: i32 => I32;
        i64: i64 => I64;
        f32: f32 => F32;
        f64: f64 => F64;
    }

    fn utf8(&mut self, tag: Tag) -> Result<&'a str> {
        self.expect(tag)?;
        let len = self.length()?;
        std::str::from_utf8(self.take(len)?).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes a string slice.
    pub fn str(&mut self) -> Result<&'a str> {
        self.utf8(Tag::Str)
    }

    /// Decodes a remote object identity.
    pub fn reference(&mut self) -> Result<&'a str> {
        self.utf8(Tag::Ref)
    }

    /// Enters a List and iterates its items.
    pub fn list(&mut self) -> Result<Items<'a>> {
        Ok(Items { dec: self.enter(Tag::List)? })
    }

    /// Enters a Map and iterates its entries.
    pub fn map(&mut self) -> Result<Entries<'a>> {
        Ok(Entries { dec: self.enter(Tag::Map)? })
    }

    /// Decodes an Entry into `(name, payload)`.
    pub fn entry(&mut self) -> Result<(&'a str, Decoder<'a>)> {
        let mut body = self.enter(Tag::Entry)?;
        let name = body.str()?;
        Ok((name, body))
    }

    /// Decodes an `Ok`/`Err` wrapper into the payload decoder of the taken side.
    pub fn outcome(&mut self) -> Result<std::result::Result<Decoder<'a>, Decoder<'a>>> {
        match self.peek_tag()? {
            Tag::Ok => Ok(Ok(self.enter(Tag::Ok)?)),
            Tag::Err => Ok(Err(self.enter(Tag::Err)?)),
            found => Err(Error::WrongTag { expected: Tag::Ok, found }),
        }
    }
}

/// Items of a List, one decoder per item.
///
/// Stops after yielding the first error.
#[derive(Debug)]
pub struct Items<'a> {
    dec: Decoder<'a>,
}

impl<'a> Iterator for Items<'a> {
    type Item = Result<Decoder<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.dec.is_empty() {
            return None;
        }
        let item = self.dec.split_item();
        if item.is_err() {
            self.dec = Decoder::new(&[]);
        }
        Some(item)
    }
}

/// Entries of a Map as `(key, payload)` pairs, in wire order.
///
/// Stops after yielding the first error.
#[derive(Debug)]
pub struct Entries<'a> {
    dec: Decoder<'a>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<(&'a str, Decoder<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.dec.is_empty() {
            return None;
        }
        let entry = self.dec.entry();
        if entry.is_err() {
            self.dec = Decoder::new(&[]);
        }
        Some(entry)
    }
}

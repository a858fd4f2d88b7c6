/// Identifies the shape of the next encoded item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Absent value (a remote `null` or `void`).
    Null = 0x00,
    True = 0x01,
    False = 0x02,
    I32 = 0x03,
    I64 = 0x04,
    F32 = 0x05,
    F64 = 0x06,

    // Blobs (Tag + u32 Len + Bytes)
    Str = 0x10,
    /// Identity token of an object owned by the remote runtime.
    Ref = 0x11,

    // Containers (Tag + u32 Len + Body)
    List = 0x20,
    /// Body holds only `Entry` items.
    Map = 0x21,
    /// A name followed by exactly one payload item.
    Entry = 0x30,
    Ok = 0x31,
    Err = 0x32,
}

/// How many bytes follow a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Body {
    Fixed(usize),
    Prefixed,
}

impl Tag {
    /// Returns the Tag for a given byte, or `None` if the byte is not a tag.
    pub fn from_u8(b: u8) -> Option<Self> {
        Some(match b {
            0x00 => Tag::Null,
            0x01 => Tag::True,
            0x02 => Tag::False,
            0x03 => Tag::I32,
            0x04 => Tag::I64,
            0x05 => Tag::F32,
            0x06 => Tag::F64,
            0x10 => Tag::Str,
            0x11 => Tag::Ref,
            0x20 => Tag::List,
            0x21 => Tag::Map,
            0x30 => Tag::Entry,
            0x31 => Tag::Ok,
            0x32 => Tag::Err,
            _ => return None,
        })
    }

    /// Short lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::True | Tag::False => "bool",
            Tag::I32 => "i32",
            Tag::I64 => "i64",
            Tag::F32 => "f32",
            Tag::F64 => "f64",
            Tag::Str => "string",
            Tag::Ref => "ref",
            Tag::List => "list",
            Tag::Map => "map",
            Tag::Entry => "entry",
            Tag::Ok => "ok",
            Tag::Err => "err",
        }
    }

    pub(crate) fn body(self) -> Body {
        match self {
            Tag::Null | Tag::True | Tag::False => Body::Fixed(0),
            Tag::I32 | Tag::F32 => Body::Fixed(4),
            Tag::I64 | Tag::F64 => Body::Fixed(8),
            Tag::Str | Tag::Ref | Tag::List | Tag::Map | Tag::Entry | Tag::Ok | Tag::Err => {
                Body::Prefixed
            }
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//! # Wirepack
//!
//! The byte format spoken between the host bridge and the remote backend.
//!
//! ## Philosophy
//!
//! - **Explicit State**: The encoder tracks open scopes on a stack and back-patches
//!   lengths. No hidden buffering, no implicit closing.
//! - **TLV Architecture**: `[Tag][Length?][Value]` lets a reader skip anything it
//!   does not understand.
//! - **Bounded**: Decoders are zero-copy views. Every read is bounds-checked and
//!   returns a `Result`; malformed input never panics.
//!
//! ## Format
//!
//! - **Scalars**: `[Tag: 1b][Data: 0|4|8b]`
//! - **Blobs** (`Str`, `Ref`): `[Tag: 1b][Len: 4b][Bytes: Len]`
//! - **Containers** (`List`, `Map`, `Entry`, `Ok`, `Err`): `[Tag: 1b][Len: 4b][Body: Len]`
//!
//! All integers are little-endian.

mod decoder;
mod encoder;
mod error;
mod tag;

pub use decoder::Decoder;
pub use decoder::Entries;
pub use decoder::Items;
pub use encoder::Encoder;
pub use encoder::Scope;
pub use error::Error;
pub use error::Result;
pub use tag::Tag;

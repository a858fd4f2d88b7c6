//! # WireRPC
//!
//! A strict, kind-driven call protocol over Wirepack.
//!
//! ## Architecture
//!
//! The host and the remote runtime have independent type systems. This crate
//! gives them a neutral meeting point: a [`Value`] tree that both sides can
//! produce, a [`Kind`] that says what shape the caller expects back, and a pair
//! of frames (`Call`, `Reply`) that carry them. Decoding is always done against
//! an expected kind, so a reply that disagrees with the caller's expectation is
//! rejected at the boundary instead of being coerced.

mod codec;
mod error;
mod frame;
mod value;

pub use codec::decode_value;
pub use codec::encode_value;
pub use codec::MAX_RECURSION_DEPTH;
pub use error::Error;
pub use error::Result;
pub use frame::decode_seq;
pub use frame::CallDecoder;
pub use frame::CallEncoder;
pub use frame::Fault;
pub use frame::ReplyDecoder;
pub use frame::ReplyErrEncoder;
pub use frame::ReplyOkEncoder;
pub use frame::RpcFrame;
pub use frame::Target;
pub use value::Kind;
pub use value::ObjectId;
pub use value::Value;

/// Reserved method name for constructors, invoked as a static call.
pub const CONSTRUCTOR: &str = "<init>";

#[cfg(test)]
mod tests;

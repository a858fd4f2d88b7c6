//! # JVM Bridge
//!
//! Drives objects that live inside a remote JVM as if they were local.
//!
//! A [`Session`] owns one synchronous call channel. Constructing a proxy
//! allocates its companion object on the remote side, and every accessor is
//! a blocking round trip: arguments are encoded, the call is sent, and the
//! reply is decoded against the kind the accessor declared. Replies that are
//! themselves objects come back as [`ObjectRef`]s and are rewrapped into the
//! right proxy type by the [`resolve`] module.

pub mod channel;
pub mod config;
pub mod convert;
pub mod error;
pub mod logging;
pub mod loopback;
pub mod proxy;
pub mod reference;
pub mod resolve;
pub mod session;
pub mod tcp;
pub mod transport;

pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use reference::ObjectRef;
pub use session::Session;
pub use session::SessionBuilder;

pub use wirerpc::Fault;
pub use wirerpc::Kind;
pub use wirerpc::ObjectId;
pub use wirerpc::Target;
pub use wirerpc::Value;

/// Traits needed to call generated proxies.
pub mod prelude {
    pub use crate::convert::FromWire;
    pub use crate::convert::IntoParam;
    pub use crate::convert::IntoWire;
    pub use crate::proxy::RemoteClass;
    pub use crate::proxy::RemoteObject;
    pub use crate::resolve::Rewrap;
}

#[cfg(test)]
mod tests;

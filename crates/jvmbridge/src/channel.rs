//! # Invocation Channel
//!
//! Executes one remote call at a time and hands back its outcome.
//!
//! The channel is synchronous: the calling thread blocks until the reply
//! arrives or the channel fails. Transports are async, so the channel owns a
//! private current-thread runtime and drives them with `block_on`. Calling it
//! from inside an async task panics.
//!
//! ## Invariants
//!
//! - At most one call is in flight per channel; callers queue on a mutex held
//!   from encode to decode.
//! - A reply is accepted only if its sequence number matches the call's.
//! - Replies are decoded against the caller's expected kind, never coerced.
//! - Once closed, every call fails with `TransportError::Closed`.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::Mutex as AsyncMutex;

use wirepack::Decoder;
use wirerpc::CallEncoder;
use wirerpc::Kind;
use wirerpc::RpcFrame;
use wirerpc::Target;
use wirerpc::Value;

use crate::error::Error;
use crate::error::Result;
use crate::transport::Transport;
use crate::transport::TransportError;

pub struct Channel {
    runtime: Runtime,
    transport: Arc<dyn Transport>,
    seq: AtomicI64,
    in_flight: AsyncMutex<()>,
    closed: AtomicBool,
}

impl Channel {
    /// Creates a channel with its own runtime.
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::with_runtime(build_runtime()?, transport))
    }

    /// Creates a channel over a transport that was set up on `runtime`.
    ///
    /// Socket transports register with the reactor of the runtime they were
    /// created on, so that runtime must be the one that drives them.
    pub fn with_runtime(runtime: Runtime, transport: Arc<dyn Transport>) -> Self {
        Self {
            runtime,
            transport,
            seq: AtomicI64::new(1),
            in_flight: AsyncMutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// Invokes `method` on `target` and decodes the reply as `expected`.
    pub fn invoke(&self, target: &Target, method: &str, args: &[Value], expected: &Kind) -> Result<Value> {
        let _guard = self.in_flight.blocking_lock();
        if self.is_closed() {
            return Err(TransportError::Closed.into());
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(seq, %target, method, args = args.len(), "invoke");

        let payload = CallEncoder::new(seq, target, method, args).to_bytes()?;
        let reply = self.runtime.block_on(self.transport.call(&payload)).inspect_err(|e| {
            tracing::warn!(seq, %target, method, error = %e, "transport failed");
        })?;

        self.accept(seq, &reply, expected).inspect_err(|e| {
            tracing::warn!(seq, %target, method, error = %e, "call failed");
        })
    }

    fn accept(&self, seq: i64, reply: &[u8], expected: &Kind) -> Result<Value> {
        let mut dec = Decoder::new(reply);
        let frame = RpcFrame::decode(&mut dec).inspect_err(|e| {
            if let Ok(received) = wirerpc::decode_seq(reply) {
                tracing::warn!(seq, received, error = %e, "undecodable reply");
            }
        })?;
        dec.finish()?;

        let RpcFrame::Reply(reply) = frame else {
            return Err(Error::Protocol(wirerpc::Error::ProtocolViolation(
                "received Call frame while waiting for Reply".into(),
            )));
        };

        if reply.seq != seq {
            return Err(Error::Protocol(wirerpc::Error::ProtocolViolation(format!(
                "sequence mismatch: sent {}, received {}",
                seq, reply.seq
            ))));
        }

        let mut body = reply.status?;
        let value = wirerpc::decode_value(&mut body, expected)?;
        body.finish()?;
        Ok(value)
    }

    /// Ends the session locally. The remote side is not notified.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!("channel closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

pub(crate) fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Transport(TransportError::from(e)))
}

//! # Sessions
//!
//! A [`Session`] is a cheap, clonable handle to one channel. Every object
//! reference remembers the session that issued it.

use std::sync::Arc;

use wirerpc::Kind;
use wirerpc::Target;
use wirerpc::Value;

use crate::channel::build_runtime;
use crate::channel::Channel;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::tcp::TcpTransport;
use crate::transport::Transport;

#[derive(Clone)]
pub struct Session {
    channel: Arc<Channel>,
}

impl Session {
    /// Opens a session over an already connected transport.
    pub fn new(transport: impl Transport) -> Result<Self> {
        Ok(Self::from_channel(Channel::new(Arc::new(transport))?))
    }

    /// Opens a session over a transport the caller keeps a handle to.
    pub fn from_shared(transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_channel(Channel::new(transport)?))
    }

    pub fn from_channel(channel: Channel) -> Self {
        Self { channel: Arc::new(channel) }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Calls an instance or static method. Blocks until the reply arrives.
    pub fn invoke(&self, target: &Target, method: &str, args: &[Value], expected: &Kind) -> Result<Value> {
        self.channel.invoke(target, method, args, expected)
    }

    /// Calls a static method of the remote class `class_name`.
    pub fn invoke_static(&self, class_name: &str, method: &str, args: &[Value], expected: &Kind) -> Result<Value> {
        self.invoke(&Target::Class(class_name.to_string()), method, args, expected)
    }

    /// Ends the session. References issued by it stop working.
    pub fn close(&self) {
        self.channel.close();
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    /// Whether both handles share one channel.
    pub fn same_session(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.channel, &other.channel)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("closed", &self.is_closed()).finish()
    }
}

/// Fluent builder for sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: BridgeConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.config.max_frame_len = max_frame_len;
        self
    }

    /// Applies the environment overlay on top of the current settings.
    pub fn from_env(mut self) -> Result<Self> {
        self.config = self.config.overlay(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Connects to the remote runtime over TCP.
    pub fn connect(self) -> Result<Session> {
        let runtime = build_runtime()?;
        let addr = self.config.addr();
        tracing::info!(%addr, "connecting");
        let transport = runtime.block_on(TcpTransport::connect(addr.as_str(), self.config.max_frame_len))?;
        Ok(Session::from_channel(Channel::with_runtime(runtime, Arc::new(transport))))
    }

    /// Opens a session over a caller-supplied transport.
    pub fn transport(self, transport: impl Transport) -> Result<Session> {
        Session::new(transport)
    }
}

//! Connection settings.

use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5567;
/// Largest reply accepted from the remote runtime.
pub const DEFAULT_MAX_FRAME_LEN: usize = 256 * 1024 * 1024;

pub const ENV_HOST: &str = "JVMBRIDGE_HOST";
pub const ENV_PORT: &str = "JVMBRIDGE_PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub max_frame_len: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl BridgeConfig {
    /// Overrides fields with whatever `lookup` finds for the env keys.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = lookup(ENV_HOST) {
            let host = host.trim();
            if host.is_empty() {
                return Err(Error::InvalidConfig(format!("{} is empty", ENV_HOST)));
            }
            self.host = host.to_string();
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{} is not a port: {:?}", ENV_PORT, port)))?;
        }
        Ok(self)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

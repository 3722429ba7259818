//! Runtime transport settings injected into dialers and listeners.

use std::time::Duration;

use gost_config::TcpConfig;
use gost_core::defaults;

/// Read-only socket settings, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Default connect timeout per dial attempt.
    pub dial_timeout: Duration,
    /// Keep-alive probe period for accepted connections.
    pub keepalive: Duration,
    /// Set TCP_NODELAY on dialed connections.
    pub no_delay: bool,
    /// Set SO_REUSEPORT on dialing sockets (Unix only).
    pub reuse_port: bool,
    /// Listen backlog.
    pub backlog: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(defaults::DEFAULT_DIAL_TIMEOUT_SECS),
            keepalive: Duration::from_secs(defaults::DEFAULT_KEEPALIVE_SECS),
            no_delay: defaults::DEFAULT_TCP_NO_DELAY,
            reuse_port: defaults::DEFAULT_TCP_REUSE_PORT,
            backlog: defaults::DEFAULT_CONNECTION_BACKLOG,
        }
    }
}

impl From<&TcpConfig> for TransportSettings {
    fn from(config: &TcpConfig) -> Self {
        Self {
            dial_timeout: Duration::from_secs(config.dial_timeout_secs),
            keepalive: Duration::from_secs(config.keepalive_secs),
            no_delay: config.no_delay,
            reuse_port: config.reuse_port,
            backlog: config.backlog,
        }
    }
}

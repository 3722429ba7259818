//! Configuration type definitions for forwarding, TCP socket options, and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub forward: ForwardConfig,
    #[serde(default)]
    pub tcp: TcpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Port forwarding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub listen: String,
    /// Destination every accepted connection is forwarded to (host:port).
    pub target: String,
    /// Local source addresses for outbound dials, tried in order.
    #[serde(default)]
    pub source_addrs: Vec<String>,
    /// Close a forwarded connection after this many idle seconds (0 = never).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Time to wait for active connections on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    /// Relay buffer size per direction (bytes).
    #[serde(default = "default_relay_buffer_size")]
    pub relay_buffer_size: usize,
}

impl Config {
    /// Config with default `tcp` and `logging` sections.
    pub fn new(forward: ForwardConfig) -> Self {
        Self {
            forward,
            tcp: TcpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ForwardConfig {
    /// Forward `listen` to `target` with default limits and no source addresses.
    pub fn new(listen: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            listen: listen.into(),
            target: target.into(),
            source_addrs: Vec::new(),
            idle_timeout_secs: default_idle_timeout_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            relay_buffer_size: default_relay_buffer_size(),
        }
    }
}

/// TCP socket configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Connect timeout per dial attempt, in seconds.
    #[serde(default = "default_dial_timeout_secs")]
    pub dial_timeout_secs: u64,
    /// TCP keep-alive probe period for accepted connections, in seconds.
    #[serde(default = "default_tcp_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Disable Nagle's algorithm (TCP_NODELAY) on dialed connections.
    #[serde(default = "default_tcp_no_delay")]
    pub no_delay: bool,
    /// Set SO_REUSEPORT on dialing sockets so pinned source ports can be shared.
    #[serde(default = "default_tcp_reuse_port")]
    pub reuse_port: bool,
    /// TCP listener backlog (pending connections queue size).
    #[serde(default = "default_connection_backlog")]
    pub backlog: u32,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: default_dial_timeout_secs(),
            keepalive_secs: default_tcp_keepalive_secs(),
            no_delay: default_tcp_no_delay(),
            reuse_port: default_tcp_reuse_port(),
            backlog: default_connection_backlog(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"gost_transport": "debug"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

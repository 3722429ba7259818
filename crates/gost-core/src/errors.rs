//! Error classification labels for logging.
//!
//! These constants provide consistent error classification across all crates.

/// DNS/address resolution error.
pub const ERROR_RESOLVE: &str = "resolve";
/// Connect refused, unreachable, or reset.
pub const ERROR_CONNECT: &str = "connect";
/// Timeout error.
pub const ERROR_TIMEOUT: &str = "timeout";
/// Accept error on a listener.
pub const ERROR_ACCEPT: &str = "accept";
/// Operation on a closed listener.
pub const ERROR_CLOSED: &str = "closed";
/// Transport handshake error.
pub const ERROR_HANDSHAKE: &str = "handshake";
/// Error reported by an upstream proxy chain.
pub const ERROR_CHAIN: &str = "chain";
/// I/O error.
pub const ERROR_IO: &str = "io";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";

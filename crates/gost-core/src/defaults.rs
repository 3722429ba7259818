//! Default configuration values.
//!
//! Centralized default constants for use across all crates. Runtime code never
//! reads these directly: they seed the config types, which are then injected
//! into dialers and listeners at construction time.

// ============================================================================
// Timeout Defaults
// ============================================================================

/// Default connect timeout for a single dial attempt, in seconds.
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 5;
/// Default idle timeout for a forwarded connection, in seconds (0 = none).
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// TCP Socket Defaults
// ============================================================================

/// Default TCP keep-alive probe period in seconds.
pub const DEFAULT_KEEPALIVE_SECS: u64 = 180;
/// Default TCP_NODELAY on dialed connections.
pub const DEFAULT_TCP_NO_DELAY: bool = true;
/// Default SO_REUSEPORT on dialing sockets (Unix only).
pub const DEFAULT_TCP_REUSE_PORT: bool = true;
/// Default TCP listener backlog.
pub const DEFAULT_CONNECTION_BACKLOG: u32 = 1024;

// ============================================================================
// Relay Defaults
// ============================================================================

/// Default relay buffer size (32 KiB).
pub const DEFAULT_RELAY_BUFFER_SIZE: usize = 32768;

//! Pluggable transport layer for gost-rs.
//!
//! Upper protocol layers (SOCKS, HTTP, relays) dial and listen through the
//! [`Transporter`] and [`Listener`] traits without knowing how sockets are
//! tuned underneath.
//!
//! # Transports
//!
//! - [`tcp`]: raw TCP. Dials directly with ordered source-address fallback, or
//!   delegates to a configured [`Chain`]. No handshake, no multiplexing.
//!
//! Inbound connections come from [`KeepAliveListener`], which enables TCP
//! keep-alive probing on every accepted socket.

pub mod chain;
pub mod connection;
pub mod dialer;
pub mod error;
pub mod listener;
pub mod options;
pub mod settings;
pub mod tcp;

use std::future::Future;
use std::pin::Pin;

pub use chain::Chain;
pub use connection::{BoxConnection, Connection};
pub use error::{HandshakeError, TransportError};
pub use listener::{KeepAliveListener, Listener, ListenerState};
pub use options::{ChainDialOptions, DialOption, DialOptions, HandshakeOptions};
pub use settings::TransportSettings;
pub use tcp::TcpTransporter;

/// Boxed `Send` future, used to keep the transport traits object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One transport kind: how to dial, how to finish a connection after dialing,
/// and whether one connection can carry several logical streams.
///
/// Implementations own no per-connection state, so a single instance can be
/// shared (e.g. behind `Arc<dyn Transporter>`) and called concurrently.
pub trait Transporter: Send + Sync + 'static {
    /// Connect to `addr` (`host:port`).
    ///
    /// Either the whole dial is delegated to the chain in `options`, or the
    /// transporter connects itself; never both. No half-open connection is
    /// returned on error.
    fn dial<'a>(
        &'a self,
        addr: &'a str,
        options: DialOptions,
    ) -> BoxFuture<'a, Result<BoxConnection, TransportError>>;

    /// Run the transport-level negotiation on a dialed connection.
    ///
    /// On success the returned connection is ready for protocol traffic. On
    /// failure the original connection comes back inside [`HandshakeError`].
    fn handshake<'a>(
        &'a self,
        conn: BoxConnection,
        options: HandshakeOptions,
    ) -> BoxFuture<'a, Result<BoxConnection, HandshakeError>>;

    /// Whether several logical streams may be opened over one dial result.
    fn multiplex(&self) -> bool;

    /// Short transport name for logs.
    fn name(&self) -> &'static str;
}

//! Error types for the transport crate.

use std::fmt;
use std::io;
use std::time::Duration;

use gost_core::errors;
use thiserror::Error;

use crate::connection::BoxConnection;

/// Errors that can occur in transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to resolve {addr}: {reason}")]
    Resolve { addr: String, reason: String },

    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("connect to {addr} timed out after {timeout:?}")]
    Timeout { addr: String, timeout: Duration },

    #[error("all {attempts} source addresses failed, last error: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<TransportError>,
    },

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    #[error("listener closed")]
    ListenerClosed,

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("chain error: {0}")]
    Chain(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    pub(crate) fn resolve(addr: &str, reason: impl fmt::Display) -> Self {
        Self::Resolve {
            addr: addr.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Stable classification label for logs.
    ///
    /// `Exhausted` reports the kind of the last candidate's failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolve { .. } => errors::ERROR_RESOLVE,
            Self::Connect { .. } => errors::ERROR_CONNECT,
            Self::Timeout { .. } => errors::ERROR_TIMEOUT,
            Self::Exhausted { last, .. } => last.kind(),
            Self::Accept(_) => errors::ERROR_ACCEPT,
            Self::ListenerClosed => errors::ERROR_CLOSED,
            Self::Handshake(_) => errors::ERROR_HANDSHAKE,
            Self::Chain(_) => errors::ERROR_CHAIN,
            Self::Io(_) => errors::ERROR_IO,
        }
    }
}

/// A failed transport handshake.
///
/// The handshake never closes the connection it was given: on failure the
/// connection is handed back so the caller decides whether to retry, reuse or
/// drop it.
pub struct HandshakeError {
    pub error: TransportError,
    pub conn: BoxConnection,
}

impl HandshakeError {
    pub fn new(error: TransportError, conn: BoxConnection) -> Self {
        Self { error, conn }
    }

    /// Split into the underlying error and the untouched connection.
    pub fn into_parts(self) -> (TransportError, BoxConnection) {
        (self.error, self.conn)
    }
}

impl fmt::Debug for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeError")
            .field("error", &self.error)
            .field("peer", &self.conn.peer_addr().ok())
            .finish()
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<HandshakeError> for TransportError {
    fn from(err: HandshakeError) -> Self {
        err.error
    }
}

//! Raw TCP transporter.
//!
//! Dials either through a configured [`Chain`](crate::Chain) or directly with
//! the resilient dialer in [`crate::dialer`]. The handshake is the identity and
//! one connection carries one stream.

use tokio::net::TcpStream;
use tracing::debug;

use crate::connection::BoxConnection;
use crate::dialer;
use crate::error::{HandshakeError, TransportError};
use crate::options::{ChainDialOptions, DialOptions, HandshakeOptions};
use crate::settings::TransportSettings;
use crate::{BoxFuture, Transporter};

/// Plain TCP transporter.
#[derive(Debug, Clone, Default)]
pub struct TcpTransporter {
    settings: TransportSettings,
}

impl TcpTransporter {
    /// Create a transporter with the given socket settings.
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// Dial directly, ignoring any chain in `options`, and return the concrete stream.
    pub async fn dial_direct(
        &self,
        addr: &str,
        options: &DialOptions,
    ) -> Result<TcpStream, TransportError> {
        let timeout = options.effective_timeout(self.settings.dial_timeout);
        dialer::dial(addr, options.source_addrs_list(), timeout, &self.settings).await
    }
}

impl Transporter for TcpTransporter {
    fn dial<'a>(
        &'a self,
        addr: &'a str,
        options: DialOptions,
    ) -> BoxFuture<'a, Result<BoxConnection, TransportError>> {
        Box::pin(async move {
            if let Some(chain) = options.chain_ref() {
                let forwarded = ChainDialOptions::from(&options);
                debug!(addr, sources = ?forwarded.source_addrs, "dial delegated to chain");
                return chain.dial(addr, forwarded).await;
            }
            let stream = self.dial_direct(addr, &options).await?;
            Ok(Box::new(stream) as BoxConnection)
        })
    }

    fn handshake<'a>(
        &'a self,
        conn: BoxConnection,
        _options: HandshakeOptions,
    ) -> BoxFuture<'a, Result<BoxConnection, HandshakeError>> {
        Box::pin(async move { Ok(conn) })
    }

    fn multiplex(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

//! Inbound TCP listener with keep-alive probing.
//!
//! Lifecycle: [`KeepAliveListener::bind`] (or [`KeepAliveListener::from_listener`])
//! yields a listening socket; [`close`](Listener::close) releases it for good.
//! Accepting after close fails with [`TransportError::ListenerClosed`].

use std::net::SocketAddr;
use std::time::Duration;

use socket2::{Domain, Protocol, SockRef, Socket, TcpKeepalive, Type};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, trace};

use crate::connection::BoxConnection;
use crate::dialer::resolve_remote;
use crate::error::TransportError;
use crate::settings::TransportSettings;
use crate::BoxFuture;

/// Source of inbound connections.
///
/// Accept is single-consumer: it takes `&mut self`, so one accept loop owns
/// the listener.
pub trait Listener: Send {
    /// Wait for the next inbound connection.
    ///
    /// Errors are returned as-is; retry policy belongs to the accept loop.
    fn accept(&mut self) -> BoxFuture<'_, Result<BoxConnection, TransportError>>;

    /// Release the bound socket. Idempotent.
    fn close(&mut self);

    /// Address the listener is bound to.
    fn local_addr(&self) -> Result<SocketAddr, TransportError>;
}

/// Listener lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    Closed,
}

/// TCP listener that enables keep-alive on every accepted connection.
#[derive(Debug)]
pub struct KeepAliveListener {
    inner: Option<TcpListener>,
    keepalive: Duration,
}

impl KeepAliveListener {
    /// Resolve `addr` and start listening with the configured backlog.
    ///
    /// Resolution and bind errors are returned unchanged.
    pub async fn bind(addr: &str, settings: &TransportSettings) -> Result<Self, TransportError> {
        let local = resolve_remote(addr).await?[0];
        let listener = create_listener(local, settings.backlog)?;
        debug!(address = %local, backlog = settings.backlog, "listening");
        Ok(Self::from_listener(listener, settings.keepalive))
    }

    /// Wrap an already bound listener.
    pub fn from_listener(listener: TcpListener, keepalive: Duration) -> Self {
        Self {
            inner: Some(listener),
            keepalive,
        }
    }

    pub fn state(&self) -> ListenerState {
        if self.inner.is_some() {
            ListenerState::Listening
        } else {
            ListenerState::Closed
        }
    }

    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    /// Accept one connection and enable keep-alive on it.
    pub async fn accept_tcp(&mut self) -> Result<(TcpStream, SocketAddr), TransportError> {
        let listener = self.inner.as_ref().ok_or(TransportError::ListenerClosed)?;
        let (stream, peer) = listener.accept().await.map_err(TransportError::Accept)?;
        set_keepalive(&stream, self.keepalive)?;
        trace!(peer = %peer, "accepted");
        Ok((stream, peer))
    }
}

impl Listener for KeepAliveListener {
    fn accept(&mut self) -> BoxFuture<'_, Result<BoxConnection, TransportError>> {
        Box::pin(async move {
            let (stream, _) = self.accept_tcp().await?;
            Ok(Box::new(stream) as BoxConnection)
        })
    }

    fn close(&mut self) {
        if let Some(listener) = self.inner.take() {
            debug!(address = ?listener.local_addr().ok(), "listener closed");
        }
    }

    fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        let listener = self.inner.as_ref().ok_or(TransportError::ListenerClosed)?;
        Ok(listener.local_addr()?)
    }
}

/// Create a TCP listener with address reuse and a custom backlog.
fn create_listener(addr: SocketAddr, backlog: u32) -> Result<TcpListener, TransportError> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;
    let listener = TcpListener::from_std(std::net::TcpListener::from(socket))?;
    Ok(listener)
}

/// Keep-alive options take whole seconds: round up, never below one second.
fn keepalive_period(period: Duration) -> Duration {
    let secs = period.as_secs() + u64::from(period.subsec_nanos() > 0);
    Duration::from_secs(secs.max(1))
}

/// Enable keep-alive with `period` as both idle time and probe interval.
fn set_keepalive(stream: &TcpStream, period: Duration) -> Result<(), TransportError> {
    let period = keepalive_period(period);
    let keepalive = TcpKeepalive::new().with_time(period);
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "windows",
    ))]
    let keepalive = keepalive.with_interval(period);
    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keepalive_period_rounds_up_to_whole_seconds() {
        assert_eq!(keepalive_period(Duration::ZERO), Duration::from_secs(1));
        assert_eq!(keepalive_period(Duration::from_millis(500)), Duration::from_secs(1));
        assert_eq!(keepalive_period(Duration::from_millis(1500)), Duration::from_secs(2));
        assert_eq!(keepalive_period(Duration::from_secs(180)), Duration::from_secs(180));
    }

    #[tokio::test]
    async fn bind_reports_local_addr() {
        let listener = KeepAliveListener::bind("127.0.0.1:0", &TransportSettings::default())
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
        assert_eq!(listener.state(), ListenerState::Listening);
    }

    #[tokio::test]
    async fn bind_rejects_unresolvable_address() {
        let err = KeepAliveListener::bind("127.0.0.1", &TransportSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Resolve { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn bind_fails_on_port_in_use() {
        let settings = TransportSettings::default();
        let first = KeepAliveListener::bind("127.0.0.1:0", &settings).await.unwrap();
        let addr = first.local_addr().unwrap().to_string();
        // SO_REUSEADDR does not allow two active listeners on Linux.
        let err = KeepAliveListener::bind(&addr, &settings).await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)), "{err:?}");
    }

    #[tokio::test]
    async fn closed_is_terminal() {
        let mut listener = KeepAliveListener::bind("127.0.0.1:0", &TransportSettings::default())
            .await
            .unwrap();
        listener.close();
        listener.close();
        assert_eq!(listener.state(), ListenerState::Closed);
        assert!(matches!(
            listener.accept_tcp().await,
            Err(TransportError::ListenerClosed)
        ));
        assert!(matches!(
            listener.local_addr(),
            Err(TransportError::ListenerClosed)
        ));
    }
}

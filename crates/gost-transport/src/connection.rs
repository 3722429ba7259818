//! Established byte streams handed out by dialers and listeners.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A bidirectional byte stream produced by a [`Transporter`](crate::Transporter)
/// or a [`Listener`](crate::Listener).
///
/// Ownership is exclusive: once returned, the transport layer holds no
/// reference to the connection and the receiver is responsible for closing it
/// (dropping it closes the underlying socket).
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send + 'static {
    /// Local address of the underlying socket.
    fn local_addr(&self) -> io::Result<SocketAddr>;

    /// Address of the remote peer.
    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

/// Type-erased connection, as passed through the [`Transporter`](crate::Transporter) trait.
pub type BoxConnection = Box<dyn Connection>;

impl Connection for TcpStream {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::local_addr(self)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        (**self).local_addr()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        (**self).peer_addr()
    }
}

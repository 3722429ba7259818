//! Keep-alive listener behavior.
#![allow(clippy::tests_outside_test_module)]

use std::time::Duration;

use gost_transport::{
    Connection, KeepAliveListener, Listener, ListenerState, TransportError, TransportSettings,
};
use socket2::SockRef;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn settings(keepalive: Duration) -> TransportSettings {
    TransportSettings {
        keepalive,
        ..TransportSettings::default()
    }
}

#[tokio::test]
async fn accepted_connections_have_keepalive() {
    let period = Duration::from_secs(42);
    let mut listener = KeepAliveListener::bind("127.0.0.1:0", &settings(period))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let client = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
    let (stream, peer) = listener.accept_tcp().await.unwrap();
    let client = client.await.unwrap();
    assert_eq!(peer, client.local_addr().unwrap());

    let sock = SockRef::from(&stream);
    assert!(sock.keepalive().unwrap());
    #[cfg(target_os = "linux")]
    {
        assert_eq!(sock.keepalive_time().unwrap(), period);
        assert_eq!(sock.keepalive_interval().unwrap(), period);
    }
}

#[tokio::test]
async fn sub_second_keepalive_still_accepts() {
    for period in [Duration::from_millis(500), Duration::ZERO] {
        let raw = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = raw.local_addr().unwrap();
        let mut listener = KeepAliveListener::from_listener(raw, period);

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"hi").await.unwrap();
            stream
        });
        let (mut stream, _) = listener.accept_tcp().await.unwrap();
        let _client = client.await.unwrap();

        let sock = SockRef::from(&stream);
        assert!(sock.keepalive().unwrap());
        #[cfg(target_os = "linux")]
        assert_eq!(sock.keepalive_time().unwrap(), Duration::from_secs(1));

        let mut buf = [0u8; 2];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hi");
    }
}

#[tokio::test]
async fn plain_accept_has_no_keepalive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let client = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
    let (stream, _) = listener.accept().await.unwrap();
    let _client = client.await.unwrap();

    assert!(!SockRef::from(&stream).keepalive().unwrap());
}

#[tokio::test]
async fn wrapping_an_existing_listener_adds_keepalive() {
    let raw = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = raw.local_addr().unwrap();
    let mut listener = KeepAliveListener::from_listener(raw, Duration::from_secs(30));
    assert_eq!(listener.keepalive(), Duration::from_secs(30));

    let client = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"hello").await.unwrap();
        stream
    });

    let mut conn = Listener::accept(&mut listener).await.unwrap();
    let _client = client.await.unwrap();
    assert_eq!(conn.local_addr().unwrap(), addr);

    let mut buf = [0u8; 5];
    conn.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello");
}

#[tokio::test]
async fn accept_after_close_fails() {
    let mut listener = KeepAliveListener::bind("127.0.0.1:0", &TransportSettings::default())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    Listener::close(&mut listener);
    assert_eq!(listener.state(), ListenerState::Closed);

    let err = Listener::accept(&mut listener).await.err().unwrap();
    assert!(matches!(err, TransportError::ListenerClosed));

    // The socket is released: nothing accepts on the old address any more.
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn accept_loop_serves_several_clients() {
    let mut listener = KeepAliveListener::bind("127.0.0.1:0", &TransportSettings::default())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let clients = tokio::spawn(async move {
        let mut streams = Vec::new();
        for _ in 0..3 {
            streams.push(TcpStream::connect(addr).await.unwrap());
        }
        streams
    });

    for _ in 0..3 {
        let (stream, _) = listener.accept_tcp().await.unwrap();
        assert!(SockRef::from(&stream).keepalive().unwrap());
    }
    assert_eq!(clients.await.unwrap().len(), 3);
}

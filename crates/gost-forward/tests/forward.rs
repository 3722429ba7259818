//! End-to-end forwarding through a keep-alive listener and the TCP transporter.

use std::sync::Arc;
use std::time::Duration;

use gost_config::{Config, ForwardConfig};
use gost_forward::{CancellationToken, run_with_shutdown, serve};
use gost_transport::{KeepAliveListener, Listener, TcpTransporter, TransportSettings, Transporter};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_echo() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (mut r, mut w) = stream.split();
                let _ = tokio::io::copy(&mut r, &mut w).await;
            });
        }
    });
    addr.to_string()
}

async fn echo_roundtrip(addr: &str, payload: &[u8]) -> Vec<u8> {
    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(payload).await.unwrap();
    let mut buf = vec![0u8; payload.len()];
    tokio::time::timeout(Duration::from_secs(5), client.read_exact(&mut buf))
        .await
        .expect("echo timed out")
        .unwrap();
    buf
}

#[tokio::test]
async fn forwards_through_fallback_source() {
    let target = spawn_echo().await;
    let settings = TransportSettings::default();
    let listener = KeepAliveListener::bind("127.0.0.1:0", &settings).await.unwrap();
    let listen = listener.local_addr().unwrap().to_string();

    let mut forward = ForwardConfig::new(listen.clone(), target);
    forward.source_addrs = vec!["192.0.2.1".into(), "127.0.0.1".into()];
    let transporter: Arc<dyn Transporter> = Arc::new(TcpTransporter::new(settings));

    let shutdown = CancellationToken::new();
    let server = tokio::spawn(serve(
        listener,
        transporter,
        Arc::new(forward),
        shutdown.clone(),
    ));

    for i in 0..3u8 {
        let payload = [i; 64];
        assert_eq!(echo_roundtrip(&listen, &payload).await, payload);
    }

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve did not stop")
        .unwrap()
        .unwrap();
    assert!(TcpStream::connect(&listen).await.is_err());
}

#[tokio::test]
async fn unreachable_target_closes_the_client() {
    let unused = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let target = unused.local_addr().unwrap().to_string();
    drop(unused);

    let settings = TransportSettings::default();
    let listener = KeepAliveListener::bind("127.0.0.1:0", &settings).await.unwrap();
    let listen = listener.local_addr().unwrap().to_string();
    let transporter: Arc<dyn Transporter> = Arc::new(TcpTransporter::new(settings));
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(serve(
        listener,
        transporter,
        Arc::new(ForwardConfig::new(listen.clone(), target)),
        shutdown.clone(),
    ));

    let mut client = TcpStream::connect(&listen).await.unwrap();
    let mut buf = [0u8; 8];
    let n = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buf))
        .await
        .expect("client was not closed")
        .unwrap_or(0);
    assert_eq!(n, 0);

    shutdown.cancel();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn run_with_shutdown_rejects_bad_listen_address() {
    let config = Config::new(ForwardConfig::new("not-an-address", "127.0.0.1:80"));
    let err = run_with_shutdown(config, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(!err.to_string().is_empty());
}

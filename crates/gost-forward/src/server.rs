//! Forwarding accept loop.

use std::sync::Arc;
use std::time::Duration;

use gost_config::{Config, ForwardConfig};
use gost_transport::{
    Connection, DialOptions, HandshakeOptions, KeepAliveListener, Listener, TcpTransporter,
    TransportError, TransportSettings, Transporter,
};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::ForwardError;
use crate::relay::relay_bidirectional;
use crate::tracker::ConnectionTracker;

/// Back-off after a failed accept, so a persistent error does not spin.
const ACCEPT_ERROR_DELAY: Duration = Duration::from_millis(50);

/// Bind `forward.listen` and serve until `shutdown` is cancelled.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(), ForwardError> {
    let settings = TransportSettings::from(&config.tcp);
    let listener = KeepAliveListener::bind(&config.forward.listen, &settings).await?;
    info!(
        listen = %listener.local_addr()?,
        dest = %config.forward.target,
        sources = ?config.forward.source_addrs,
        "forwarding"
    );
    let transporter: Arc<dyn Transporter> = Arc::new(TcpTransporter::new(settings));
    serve(listener, transporter, Arc::new(config.forward), shutdown).await
}

/// Accept from `listener` and forward each connection through `transporter`.
///
/// Returns once `shutdown` is cancelled and active connections have drained
/// (or `shutdown_timeout_secs` elapsed).
pub async fn serve(
    mut listener: KeepAliveListener,
    transporter: Arc<dyn Transporter>,
    forward: Arc<ForwardConfig>,
    shutdown: CancellationToken,
) -> Result<(), ForwardError> {
    let tracker = ConnectionTracker::default();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("shutdown signal received, stopping accept loop");
                break;
            }

            result = listener.accept_tcp() => {
                let (inbound, peer) = match result {
                    Ok(accepted) => accepted,
                    Err(TransportError::ListenerClosed) => break,
                    Err(e) => {
                        warn!(error = %e, kind = e.kind(), "accept failed");
                        tokio::time::sleep(ACCEPT_ERROR_DELAY).await;
                        continue;
                    }
                };
                debug!(peer = %peer, "new connection");

                let guard = tracker.track();
                let transporter = transporter.clone();
                let forward = forward.clone();
                tokio::spawn(
                    async move {
                        if let Err(e) = handle_connection(inbound, transporter.as_ref(), &forward).await {
                            debug!(error = %e, kind = e.kind(), "forward failed");
                        }
                        drop(guard);
                    }
                    .instrument(info_span!("forward", peer = %peer)),
                );
            }
        }
    }

    listener.close();
    let active = tracker.count();
    if active > 0 {
        info!(active, "waiting for active connections");
        let timeout = Duration::from_secs(forward.shutdown_timeout_secs);
        if !tracker.drain(timeout).await {
            warn!(remaining = tracker.count(), "shutdown timeout, abandoning connections");
        }
    }
    Ok(())
}

async fn handle_connection(
    inbound: TcpStream,
    transporter: &dyn Transporter,
    forward: &ForwardConfig,
) -> Result<(), ForwardError> {
    let options = DialOptions::new().source_addrs(forward.source_addrs.iter().cloned());
    let outbound = match transporter.dial(&forward.target, options).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(dest = %forward.target, error = %e, kind = e.kind(), "dial failed");
            return Err(e.into());
        }
    };
    let outbound = match transporter.handshake(outbound, HandshakeOptions::new()).await {
        Ok(conn) => conn,
        Err(e) => {
            let (error, conn) = e.into_parts();
            drop(conn);
            return Err(error.into());
        }
    };
    debug!(
        transport = transporter.name(),
        local = ?outbound.local_addr().ok(),
        "connected to target"
    );

    relay_bidirectional(
        inbound,
        outbound,
        Duration::from_secs(forward.idle_timeout_secs),
        forward.relay_buffer_size,
    )
    .await?;
    Ok(())
}

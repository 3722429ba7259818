//! Direct dialing with ordered source-address fallback.
//!
//! The destination is resolved once. Without source addresses a single
//! attempt is made. With source addresses each candidate is bound and
//! connected in order; the first success wins and, if all fail, the last
//! failure is returned wrapped in [`TransportError::Exhausted`].
//!
//! The timeout bounds destination resolution and then each connect attempt,
//! not the whole loop: `n` unreachable candidates can take up to
//! `(n + 1) * timeout`.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::{TcpSocket, TcpStream, lookup_host};
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::settings::TransportSettings;

/// Connect to `addr`, trying `source_addrs` in order as local bind addresses.
pub async fn dial(
    addr: &str,
    source_addrs: &[String],
    timeout: Duration,
    settings: &TransportSettings,
) -> Result<TcpStream, TransportError> {
    let targets = within(addr, timeout, resolve_remote(addr)).await??;
    trace!(addr, resolved = ?targets, "dialing");

    if source_addrs.is_empty() {
        let stream = connect_within(addr, &targets, None, timeout, settings).await?;
        return finish(stream, settings);
    }

    let mut last_err = None;
    for src in source_addrs {
        let attempt = match resolve_local(src, &targets).await {
            Ok(local) => connect_within(addr, &targets, Some(local), timeout, settings).await,
            Err(e) => Err(e),
        };
        match attempt {
            Ok(stream) => {
                debug!(addr, source = %src, "connected");
                return finish(stream, settings);
            }
            Err(e) => {
                debug!(addr, source = %src, error = %e, "source address failed");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(last) => Err(TransportError::Exhausted {
            attempts: source_addrs.len(),
            last: Box::new(last),
        }),
        None => Err(TransportError::resolve(addr, "no source address")),
    }
}

fn finish(stream: TcpStream, settings: &TransportSettings) -> Result<TcpStream, TransportError> {
    if settings.no_delay {
        stream.set_nodelay(true)?;
    }
    Ok(stream)
}

/// Resolve the destination. Failure here aborts the whole dial.
pub async fn resolve_remote(addr: &str) -> Result<Vec<SocketAddr>, TransportError> {
    if let Ok(sa) = addr.parse::<SocketAddr>() {
        return Ok(vec![sa]);
    }
    let addrs: Vec<SocketAddr> = lookup_host(addr)
        .await
        .map_err(|e| TransportError::resolve(addr, e))?
        .collect();
    if addrs.is_empty() {
        return Err(TransportError::resolve(addr, "no addresses found"));
    }
    Ok(addrs)
}

/// Run `fut` under `timeout`, reporting expiry as [`TransportError::Timeout`].
async fn within<F: Future>(
    addr: &str,
    timeout: Duration,
    fut: F,
) -> Result<F::Output, TransportError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| TransportError::Timeout {
            addr: addr.to_string(),
            timeout,
        })
}

/// Resolve a source address candidate into a local bind address.
///
/// Accepts `ip:port`, a bare `ip` (ephemeral port), `[v6]`, or `host[:port]`.
/// A hostname binds its first address in the family of one of `targets`,
/// falling back to its first address.
pub async fn resolve_local(
    src: &str,
    targets: &[SocketAddr],
) -> Result<SocketAddr, TransportError> {
    let src = src.trim();
    if let Ok(sa) = src.parse::<SocketAddr>() {
        return Ok(sa);
    }
    let bare = src
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(src);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, 0));
    }
    let resolved = if src.contains(':') {
        lookup_host(src).await.map(|addrs| addrs.collect::<Vec<_>>())
    } else {
        lookup_host((src, 0)).await.map(|addrs| addrs.collect::<Vec<_>>())
    }
    .map_err(|e| TransportError::resolve(src, e))?;
    same_family_first(&resolved, targets)
        .ok_or_else(|| TransportError::resolve(src, "no addresses found"))
}

fn same_family_first(locals: &[SocketAddr], targets: &[SocketAddr]) -> Option<SocketAddr> {
    locals
        .iter()
        .copied()
        .find(|l| targets.iter().any(|t| t.is_ipv4() == l.is_ipv4()))
        .or_else(|| locals.first().copied())
}

/// One connect attempt bounded by `timeout`.
///
/// Destination addresses are tried in resolution order, restricted to the
/// local address family when bound.
async fn connect_within(
    addr: &str,
    targets: &[SocketAddr],
    local: Option<SocketAddr>,
    timeout: Duration,
    settings: &TransportSettings,
) -> Result<TcpStream, TransportError> {
    let candidates: Vec<SocketAddr> = targets
        .iter()
        .copied()
        .filter(|t| local.is_none_or(|l| l.is_ipv4() == t.is_ipv4()))
        .collect();
    if candidates.is_empty() {
        return Err(TransportError::resolve(
            addr,
            format!("no address in the family of local address {}", fmt_local(local)),
        ));
    }

    within(addr, timeout, connect_any(&candidates, local, settings))
        .await?
        .map_err(|source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        })
}

async fn connect_any(
    targets: &[SocketAddr],
    local: Option<SocketAddr>,
    settings: &TransportSettings,
) -> io::Result<TcpStream> {
    let mut last_err = None;
    for &target in targets {
        // The socket is consumed by connect and dropped on failure.
        let result = match outbound_socket(target, local, settings) {
            Ok(socket) => socket.connect(target).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                trace!(target = %target, local = %fmt_local(local), error = %e, "connect failed");
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::other("no destination address")))
}

/// Create a dialing socket with address reuse, bound to `local` if given.
fn outbound_socket(
    target: SocketAddr,
    local: Option<SocketAddr>,
    settings: &TransportSettings,
) -> io::Result<TcpSocket> {
    let socket = if target.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    set_reuse_port(&socket, settings.reuse_port)?;
    if let Some(local) = local {
        socket.bind(local)?;
    }
    Ok(socket)
}

#[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
fn set_reuse_port(socket: &TcpSocket, enabled: bool) -> io::Result<()> {
    if enabled {
        socket.set_reuseport(true)?;
    }
    Ok(())
}

#[cfg(not(all(unix, not(any(target_os = "solaris", target_os = "illumos")))))]
fn set_reuse_port(_socket: &TcpSocket, _enabled: bool) -> io::Result<()> {
    Ok(())
}

fn fmt_local(local: Option<SocketAddr>) -> String {
    local.map_or_else(|| "any".to_string(), |l| l.to_string())
}

//! Bidirectional relay with an idle timeout.
//!
//! Both streams are wrapped so every successful read stamps a shared clock.
//! The copy itself is `tokio::io::copy_bidirectional_with_sizes`, which drives
//! the two directions independently and propagates half-close.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::Instant;
use tracing::debug;

/// Last-activity clock shared by both directions.
struct IdleClock {
    start: Instant,
    last_ms: AtomicU64,
}

impl IdleClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            last_ms: AtomicU64::new(0),
        }
    }

    fn touch(&self) {
        let now = self.start.elapsed().as_millis() as u64;
        self.last_ms.store(now, Ordering::Relaxed);
    }

    fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_ms.load(Ordering::Relaxed));
        self.start.elapsed().saturating_sub(last)
    }
}

struct Tracked<S> {
    inner: S,
    clock: Arc<IdleClock>,
}

impl<S: AsyncRead + Unpin> AsyncRead for Tracked<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if matches!(poll, Poll::Ready(Ok(()))) && buf.filled().len() > before {
            self.clock.touch();
        }
        poll
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Tracked<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, data)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

/// Relay until both sides finish, an I/O error occurs, or nothing moved for
/// `idle_timeout` (`Duration::ZERO` disables the idle check).
pub async fn relay_bidirectional<A, B>(
    inbound: A,
    outbound: B,
    idle_timeout: Duration,
    buffer_size: usize,
) -> io::Result<()>
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let clock = Arc::new(IdleClock::new());
    let mut a = Tracked {
        inner: inbound,
        clock: clock.clone(),
    };
    let mut b = Tracked {
        inner: outbound,
        clock: clock.clone(),
    };

    let copy = tokio::io::copy_bidirectional_with_sizes(&mut a, &mut b, buffer_size, buffer_size);
    if idle_timeout.is_zero() {
        let (up, down) = copy.await?;
        debug!(up, down, "relay finished");
        return Ok(());
    }

    tokio::select! {
        result = copy => {
            let (up, down) = result?;
            debug!(up, down, "relay finished");
        }
        _ = idle_expired(&clock, idle_timeout) => {
            debug!(timeout = ?idle_timeout, "relay idle timeout");
        }
    }
    Ok(())
}

async fn idle_expired(clock: &IdleClock, idle_timeout: Duration) {
    loop {
        let idle = clock.idle_for();
        if idle >= idle_timeout {
            return;
        }
        tokio::time::sleep(idle_timeout - idle).await;
    }
}

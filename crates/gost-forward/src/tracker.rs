//! Active connection accounting for graceful shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Clone, Default)]
pub(crate) struct ConnectionTracker {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    active: AtomicUsize,
    idle: Notify,
}

impl ConnectionTracker {
    /// Count a connection until the returned guard is dropped.
    pub(crate) fn track(&self) -> ConnectionGuard {
        self.inner.active.fetch_add(1, Ordering::AcqRel);
        ConnectionGuard {
            inner: self.inner.clone(),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Wait until no connection is active; `false` if `timeout` elapsed first.
    pub(crate) async fn drain(&self, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.inner.idle.notified();
                if self.count() == 0 {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

pub(crate) struct ConnectionGuard {
    inner: Arc<Inner>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_returns_once_guards_drop() {
        let tracker = ConnectionTracker::default();
        let a = tracker.track();
        let b = tracker.track();
        assert_eq!(tracker.count(), 2);

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.drain(Duration::from_secs(5)).await })
        };
        drop(a);
        tokio::task::yield_now().await;
        drop(b);
        assert!(waiter.await.unwrap());
        assert_eq!(tracker.count(), 0);
    }

    #[tokio::test]
    async fn drain_times_out_with_live_guard() {
        let tracker = ConnectionTracker::default();
        let _guard = tracker.track();
        assert!(!tracker.drain(Duration::from_millis(20)).await);
    }
}

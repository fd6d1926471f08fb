//! Shutdown coordination.

use tokio::sync::watch;

/// Process-wide stop flag for the control API and other long-running tasks.
///
/// Backed by a `watch` channel, so a signal taken after [`trigger`] still
/// resolves immediately.
///
/// [`trigger`]: Shutdown::trigger
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Receiving half handed to a task; resolves once shutdown is triggered.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request shutdown. Returns `true` for the first call only.
    pub fn trigger(&self) -> bool {
        let first = !self.tx.send_replace(true);
        if first {
            tracing::info!(tasks = self.tx.receiver_count(), "Shutdown triggered");
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Wait for the trigger. Also returns if the `Shutdown` is dropped.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signals_taken_before_and_after_trigger_resolve() {
        let shutdown = Shutdown::new();
        let early = shutdown.signal();

        assert!(shutdown.trigger());
        let late = shutdown.signal();

        early.wait().await;
        late.wait().await;
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn trigger_is_idempotent() {
        let shutdown = Shutdown::default();
        assert!(shutdown.trigger());
        assert!(!shutdown.trigger());
    }

    #[tokio::test]
    async fn dropping_coordinator_releases_waiters() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        drop(shutdown);
        signal.wait().await;
    }
}

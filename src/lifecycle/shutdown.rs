//! Shutdown coordination.

use std::future::Future;

use tokio::sync::broadcast;

/// Coordinator for stopping servers started with a shutdown signal.
///
/// Provides a broadcast channel that every accept loop can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Future that resolves once [`Shutdown::trigger`] is called or the
    /// coordinator is dropped.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of loops still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_resolves_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("signal should resolve after trigger");
    }

    #[tokio::test]
    async fn drop_resolves_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .expect("signal should resolve after drop");
    }
}

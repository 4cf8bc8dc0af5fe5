//! Graceful shutdown coordinator

use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

/// Coordinates graceful teardown across server tasks
///
/// Tasks subscribe before the server starts serving; the first `shutdown`
/// call wakes every subscriber. In-memory state needs no draining, so the
/// timeout only bounds how long the serve loop waits for open connections.
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);
        Self {
            shutdown_tx,
            timeout,
        }
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Signal all subscribers to begin shutdown
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown");
        // Send fails only when no subscriber is left alive.
        let _ = self.shutdown_tx.send(());
    }
}

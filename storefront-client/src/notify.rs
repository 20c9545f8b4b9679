//! 通知中心
//!
//! Sync failures and delete outcomes end as a [`Toast`]. The sync layer only
//! sees the [`Notifier`] trait; [`ToastCenter`] fans toasts out to any number
//! of UI subscribers over a broadcast channel.

use shared::message::Toast;
use tokio::sync::broadcast;

/// Sink for user-visible notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Broadcast-backed notifier
#[derive(Debug, Clone)]
pub struct ToastCenter {
    tx: broadcast::Sender<Toast>,
}

impl ToastCenter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Receive every toast emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, toast: Toast) {
        tracing::debug!(level = %toast.level, message = %toast.message, "Toast");
        if let Err(e) = self.tx.send(toast) {
            tracing::debug!("No subscribers for toast: {}", e);
        }
    }
}

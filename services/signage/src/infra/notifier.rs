//! In-process change fan-out over a [`tokio::sync::broadcast`] channel.
//!
//! One notifier is created at startup and handed to every mutation through
//! `AppState`. Terminal event streams subscribe on connect and drop their
//! receiver on disconnect.

use tokio::sync::broadcast;

use counterate_domain::change::{ChangeKind, ChangeSignal};

use crate::domain::repository::ChangePublisher;

/// Cheaply cloneable handle to the change channel.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<ChangeSignal>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// New receiver for a connecting terminal. Slow receivers see
    /// [`broadcast::error::RecvError::Lagged`] and should re-pull.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeSignal> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ChangePublisher for BroadcastNotifier {
    fn publish(&self, kind: ChangeKind) {
        match self.tx.send(ChangeSignal::new(kind)) {
            Ok(receivers) => tracing::debug!(?kind, receivers, "change broadcast"),
            Err(_) => tracing::debug!(?kind, "change broadcast with no connected terminals"),
        }
    }
}

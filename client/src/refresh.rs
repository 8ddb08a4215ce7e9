//! Refresh generations.
//!
//! Every explicit refresh request bumps a generation counter. Reads are tagged
//! with the generation current when they started, so a consumer can tell
//! whether a value was read after a given event.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct RefreshSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Request a re-read of all chain state. Returns the new generation.
    pub fn trigger(&self) -> u64 {
        let mut next = 0;
        self.tx.send_modify(|generation| {
            *generation += 1;
            next = *generation;
        });
        tracing::debug!(generation = next, "refresh triggered");
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

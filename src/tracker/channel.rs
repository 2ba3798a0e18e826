//! Handoff channel - the seam between the network worker and the
//! consumer's scheduler.
//!
//! The network side calls [`BatchSender::push`], which never blocks.
//! The consumer side calls [`BatchReceiver::drain`] on its own schedule
//! (e.g. a fixed-period tick) and must tolerate receiving zero, one, or
//! many batches per drain. FIFO ordering is preserved and each batch is
//! delivered exactly once.

use tokio::sync::mpsc;

use super::decode::Batch;

/// Create a connected handoff channel pair.
pub fn handoff_channel() -> (BatchSender, BatchReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BatchSender { tx }, BatchReceiver { rx })
}

/// Producer half, held by the connection manager.
#[derive(Clone)]
pub struct BatchSender {
    tx: mpsc::UnboundedSender<Batch>,
}

impl BatchSender {
    /// Enqueue one batch for the consumer.
    ///
    /// Never blocks. Returns `false` if the consumer side has been
    /// dropped, which the caller may treat as a reason to wind down.
    pub fn push(&self, batch: Batch) -> bool {
        match self.tx.send(batch) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Handoff channel closed, batch dropped");
                false
            }
        }
    }

    /// Whether the consumer side is still attached.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Consumer half, polled from the consumer's own execution context.
pub struct BatchReceiver {
    rx: mpsc::UnboundedReceiver<Batch>,
}

impl BatchReceiver {
    /// Take every batch currently queued, in arrival order.
    ///
    /// Non-blocking; returns an empty vec when nothing is pending.
    pub fn drain(&mut self) -> Vec<Batch> {
        let mut batches = Vec::new();
        while let Ok(batch) = self.rx.try_recv() {
            batches.push(batch);
        }
        batches
    }

    /// Wait for the next batch (used by push-style consumers and tests).
    ///
    /// Returns `None` once the network side has gone away and the queue
    /// is empty.
    pub async fn recv(&mut self) -> Option<Batch> {
        self.rx.recv().await
    }
}

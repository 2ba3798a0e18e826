//! Status publisher - lifecycle state observation.
//!
//! Holds the current [`LifecycleState`] for read-only observation by
//! UI/host layers. Reads are lock-free atomic loads; writes come only
//! from the connection manager and supervisor. Observers can also
//! subscribe to a best-effort change notification - correctness never
//! depends on an observer seeing every transition, only the latest
//! value.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;

use super::state::LifecycleState;

/// Publishes the lifecycle state of one listener session.
///
/// Cheap to share behind an `Arc`; `get()` never blocks.
pub struct StatusPublisher {
    /// Current state, encoded for atomic access.
    state: AtomicU8,

    /// Best-effort change notification for observers.
    notify_tx: watch::Sender<LifecycleState>,
}

impl StatusPublisher {
    /// Create a new publisher in the `Stopped` state.
    pub fn new() -> Self {
        let (notify_tx, _) = watch::channel(LifecycleState::Stopped);
        Self {
            state: AtomicU8::new(LifecycleState::Stopped.to_u8()),
            notify_tx,
        }
    }

    /// Current lifecycle state (non-blocking, lock-free).
    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Publish a new state.
    ///
    /// Called only by the connection manager and supervisor. Observers
    /// that have fallen behind simply see the latest value.
    pub fn set(&self, state: LifecycleState) {
        let previous = LifecycleState::from_u8(self.state.swap(state.to_u8(), Ordering::AcqRel));
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Lifecycle transition");
        }
        // send_replace never fails even with no active receivers
        self.notify_tx.send_replace(state);
    }

    /// Subscribe to state change notifications.
    ///
    /// The receiver yields the latest value on subscription and on each
    /// subsequent change (coalesced if the observer is slow).
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.notify_tx.subscribe()
    }
}

impl Default for StatusPublisher {
    fn default() -> Self {
        Self::new()
    }
}

//! Listener facade - the control surface for one logical listener.
//!
//! `start()` spawns a supervised session on a dedicated worker task and
//! hands back the consumer half of the handoff channel; `stop()`
//! requests cooperative cancellation and waits for the session to wind
//! down. The session context is an explicit object owned by the
//! facade, so multiple independent listeners can coexist and tests get
//! clean isolation (no process-wide globals).
//!
//! Invariant: at most one session is active per `Listener`; calling
//! `start()` while the state is `Connecting` or `Running` is a no-op.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::channel::{handoff_channel, BatchReceiver};
use super::config::ListenerConfig;
use super::state::LifecycleState;
use super::status::StatusPublisher;
use super::supervisor::ReconnectSupervisor;

/// One running session: its stop token and worker task handle.
struct Session {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

/// A logical position listener with `start` / `stop` / `status`.
///
/// The status publisher outlives individual sessions, so an observer
/// holding a subscription sees the full `Stopped → Connecting →
/// Running → ... → Stopped` history across reconnects and restarts.
pub struct Listener {
    status: Arc<StatusPublisher>,
    session: Option<Session>,
}

impl Listener {
    /// Create an idle listener (state `Stopped`).
    pub fn new() -> Self {
        Self {
            status: Arc::new(StatusPublisher::new()),
            session: None,
        }
    }

    /// Start a session with the given configuration.
    ///
    /// Returns the consumer half of the handoff channel. If a session
    /// is already active (`Connecting` or `Running`), this is a no-op
    /// and returns `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, config: ListenerConfig) -> Option<BatchReceiver> {
        // The supervisor task publishes its own transitions, but it may
        // not have been scheduled yet; the session handle is the
        // authoritative guard against a second concurrent session.
        if self.status.get() != LifecycleState::Stopped
            || self
                .session
                .as_ref()
                .is_some_and(|s| !s.handle.is_finished())
        {
            warn!(state = %self.status.get(), "start() ignored, session already active");
            return None;
        }
        // A previous session has fully terminated; drop its handle.
        self.session = None;

        let (batch_tx, batch_rx) = handoff_channel();
        let stop = CancellationToken::new();
        let supervisor = ReconnectSupervisor::new(
            config,
            batch_tx,
            Arc::clone(&self.status),
            stop.clone(),
        );
        // Publish before spawning so a caller observing the status (or
        // calling start() again) never sees the stale Stopped between
        // spawn and the task's first poll. The supervisor re-publishes
        // Connecting at the top of each attempt.
        self.status.set(LifecycleState::Connecting);
        let handle = tokio::spawn(supervisor.supervise());

        self.session = Some(Session { stop, handle });
        Some(batch_rx)
    }

    /// Request a stop and wait for the session to terminate.
    ///
    /// Takes effect within one poll quantum; no reconnect attempt
    /// follows even if reconnect is enabled. A no-op when no session is
    /// active.
    pub async fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        session.stop.cancel();
        if let Err(e) = session.handle.await {
            warn!(error = %e, "Listener worker task panicked");
            // The supervisor never got to publish its terminal state.
            self.status.set(LifecycleState::Stopped);
        }
        info!("Listener stopped");
    }

    /// Current lifecycle state (non-blocking).
    pub fn status(&self) -> LifecycleState {
        self.status.get()
    }

    /// Subscribe to lifecycle change notifications (best effort).
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.status.subscribe()
    }
}

impl Default for Listener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        // Cooperative cancellation; the detached task notices the token
        // within one poll quantum.
        if let Some(session) = self.session.take() {
            session.stop.cancel();
        }
    }
}

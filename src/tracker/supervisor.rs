//! Reconnect supervisor - retry policy around one connection attempt.
//!
//! The supervisor wraps the connection manager and encodes the
//! business policy about resilience: the manager stays protocol
//! agnostic and decides only *that* a connection ended, the supervisor
//! decides *whether* to try again.
//!
//! - `UserStop` is always terminal, regardless of configuration.
//! - With reconnect disabled, any termination is terminal.
//! - Otherwise the supervisor sleeps `reconnect_delay` and starts a
//!   fresh connection attempt. The delay is a cancellable sleep: a stop
//!   request during the wait is honored immediately.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::channel::BatchSender;
use super::config::ListenerConfig;
use super::manager::ConnectionManager;
use super::state::{LifecycleState, TerminationReason};
use super::status::StatusPublisher;
use super::transport::{DatagramTransport, StreamTransport, TransportKind};

/// Supervises connection attempts for one listener session.
pub struct ReconnectSupervisor {
    config: ListenerConfig,
    batch_tx: BatchSender,
    status: Arc<StatusPublisher>,
    stop: CancellationToken,
}

impl ReconnectSupervisor {
    /// Create a supervisor for one session.
    pub fn new(
        config: ListenerConfig,
        batch_tx: BatchSender,
        status: Arc<StatusPublisher>,
        stop: CancellationToken,
    ) -> Self {
        Self {
            config,
            batch_tx,
            status,
            stop,
        }
    }

    /// Run connection attempts until terminal, then publish `Stopped`.
    pub async fn supervise(self) {
        info!(
            transport = %self.config.transport,
            endpoint = %self.config.endpoint(),
            reconnect = self.config.reconnect_enabled,
            "Listener session started"
        );

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            self.status.set(LifecycleState::Connecting);

            let reason = self.run_one_attempt().await;

            if reason == TerminationReason::UserStop {
                info!(attempts, "Session stopped by user");
                break;
            }
            if !self.config.reconnect_enabled {
                info!(attempts, reason = %reason, "Session over (reconnect disabled)");
                break;
            }

            info!(
                reason = %reason,
                delay_ms = self.config.reconnect_delay.as_millis() as u64,
                "Connection lost, waiting to reconnect"
            );
            tokio::select! {
                _ = self.stop.cancelled() => {
                    debug!("Stop requested during reconnect delay");
                }
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
            // A stop issued during the delay must not trigger another
            // attempt.
            if self.stop.is_cancelled() {
                info!(attempts, "Session stopped by user");
                break;
            }
        }

        self.status.set(LifecycleState::Stopped);
    }

    /// Run a single connection attempt over the configured transport.
    async fn run_one_attempt(&self) -> TerminationReason {
        match self.config.transport {
            TransportKind::Datagram => {
                let transport = DatagramTransport::new(self.config.endpoint());
                self.manager_for(transport).run().await
            }
            TransportKind::Stream => {
                let transport = StreamTransport::new(self.config.endpoint());
                self.manager_for(transport).run().await
            }
        }
    }

    fn manager_for<T: super::transport::Transport>(&self, transport: T) -> ConnectionManager<T> {
        ConnectionManager::new(
            transport,
            self.config.clone(),
            self.batch_tx.clone(),
            Arc::clone(&self.status),
            self.stop.clone(),
        )
    }
}

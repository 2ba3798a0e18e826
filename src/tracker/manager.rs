//! Connection manager - the connect → await-first-data → running
//! state machine for one connection attempt.
//!
//! The manager owns one transport for the lifetime of the attempt and
//! loops on `receive_frame` with a bounded poll quantum so the stop
//! token and both timeout policies are re-evaluated even when no data
//! arrives:
//!
//! - While `Connecting`: terminate with `ConnectTimeout` once
//!   `first_data_timeout` elapses without any frame.
//! - While `Running`: terminate with `Inactivity` once
//!   `inactivity_timeout` elapses since the last frame.
//! - A stop request terminates with `UserStop` at the next poll
//!   boundary, regardless of reconnect configuration.
//!
//! Individual frame decode errors never terminate the connection; only
//! transport-level errors and the two timeout conditions do. The
//! transport socket is released on every exit path when the manager is
//! dropped.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::channel::BatchSender;
use super::config::ListenerConfig;
use super::decode::decode_frame;
use super::state::{LifecycleState, TerminationReason};
use super::status::StatusPublisher;
use super::transport::Transport;

/// Runs one connection attempt to completion.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    config: ListenerConfig,
    batch_tx: BatchSender,
    status: Arc<StatusPublisher>,
    stop: CancellationToken,
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager for one connection attempt.
    ///
    /// The caller (normally the supervisor) has already published
    /// `Connecting`; the manager publishes `Running` itself when the
    /// first frame arrives.
    pub fn new(
        transport: T,
        config: ListenerConfig,
        batch_tx: BatchSender,
        status: Arc<StatusPublisher>,
        stop: CancellationToken,
    ) -> Self {
        Self {
            transport,
            config,
            batch_tx,
            status,
            stop,
        }
    }

    /// Run the connection to completion, blocking until it ends.
    pub async fn run(mut self) -> TerminationReason {
        if self.stop.is_cancelled() {
            return TerminationReason::UserStop;
        }

        if let Err(e) = self.transport.connect().await {
            warn!(error = %e, endpoint = %self.config.endpoint(), "Failed to open transport");
            return TerminationReason::TransportError;
        }

        info!(
            endpoint = %self.config.endpoint(),
            first_data_timeout_ms = self.config.first_data_timeout.as_millis() as u64,
            "Transport open, waiting for first frame"
        );

        let session_start = Instant::now();
        let mut last_frame: Option<Instant> = None;
        let mut frames_received: u64 = 0;
        let mut batches_sent: u64 = 0;

        let reason = loop {
            if self.stop.is_cancelled() {
                break TerminationReason::UserStop;
            }
            if !self.batch_tx.is_open() {
                debug!("Handoff channel closed, stopping connection");
                break TerminationReason::UserStop;
            }

            match self.transport.receive_frame(self.config.poll_quantum).await {
                Ok(Some(frame)) => {
                    frames_received += 1;
                    if last_frame.is_none() {
                        info!(len = frame.len(), "Received first frame");
                        self.status.set(LifecycleState::Running);
                    }
                    // Frame arrival is peer activity even if it decodes
                    // to nothing.
                    last_frame = Some(Instant::now());

                    let batch = decode_frame(&frame, self.transport.frame_format());
                    if !batch.is_empty() {
                        batches_sent += 1;
                        self.batch_tx.push(batch);
                    }
                }
                Ok(None) => match last_frame {
                    None if session_start.elapsed() > self.config.first_data_timeout => {
                        warn!(
                            elapsed_ms = session_start.elapsed().as_millis() as u64,
                            "No data within first-data timeout"
                        );
                        break TerminationReason::ConnectTimeout;
                    }
                    Some(at) if at.elapsed() > self.config.inactivity_timeout => {
                        warn!(
                            silent_ms = at.elapsed().as_millis() as u64,
                            frames_received, "Peer went silent"
                        );
                        break TerminationReason::Inactivity;
                    }
                    _ => trace!("No frame within poll quantum"),
                },
                Err(e) => {
                    warn!(error = %e, frames_received, "Transport failed");
                    break TerminationReason::TransportError;
                }
            }
        };

        info!(
            reason = %reason,
            frames_received,
            batches_sent,
            elapsed_ms = session_start.elapsed().as_millis() as u64,
            "Connection ended"
        );
        reason
    }
}

//! Transport abstraction - one network connection to the position peer.
//!
//! A transport owns exactly one socket for the lifetime of one
//! connection attempt and yields raw frames to the connection manager:
//!
//! - [`DatagramTransport`] - binds a UDP socket; one datagram = one
//!   frame (JSON array payload)
//! - [`StreamTransport`] - dials a TCP peer; one newline-terminated
//!   line = one frame (single JSON object payload)
//!
//! `receive_frame` is the only blocking-looking operation in the crate
//! and always bounds its wait to the caller's poll quantum, so stop
//! requests and timeout re-evaluation happen at predictable latency.
//! The socket is released on every exit path by dropping the transport.

mod datagram;
mod stream;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use super::decode::FrameFormat;

pub use datagram::DatagramTransport;
pub use stream::StreamTransport;

/// One raw frame as received from the wire.
pub type Frame = Vec<u8>;

/// Which transport variant a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Unreliable datagram (UDP); one datagram per frame.
    Datagram,
    /// Persistent stream (TCP); one newline-delimited record per frame.
    Stream,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Datagram => write!(f, "datagram"),
            Self::Stream => write!(f, "stream"),
        }
    }
}

/// Transport-level errors. All of these terminate the current
/// connection attempt and are eligible for reconnect.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind the local datagram socket.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to connect to the stream peer.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A receive operation failed (reset, broken pipe, ...).
    #[error("Receive failed: {0}")]
    Receive(#[source] std::io::Error),

    /// The stream peer closed the connection.
    #[error("Peer closed the connection")]
    PeerClosed,

    /// `receive_frame` was called before `connect`.
    #[error("Transport is not connected")]
    NotConnected,
}

/// One network connection yielding raw frames.
///
/// Implementations own their socket; dropping the transport releases
/// it. The trait is the seam that lets the connection manager stay
/// agnostic of the wire variant (and lets tests inject scripted
/// transports).
pub trait Transport: Send {
    /// Payload shape of this transport's frames.
    fn frame_format(&self) -> FrameFormat;

    /// Open the connection (bind or dial).
    fn connect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Wait up to `timeout` for one frame.
    ///
    /// Returns `Ok(None)` when the wait elapsed without a frame - the
    /// caller re-evaluates its stop flag and timeout policies and polls
    /// again.
    fn receive_frame(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Frame>, TransportError>> + Send;
}

//! Position tracker bridge - network ingest, lifecycle, and handoff.
//!
//! A remote peer streams object positions over one of two wire
//! variants (UDP datagrams carrying JSON arrays, or a TCP stream of
//! newline-delimited JSON objects). This module receives that stream,
//! decodes it into batches of [`PositionUpdate`], and relays the
//! batches to a consumer that runs on its own single-threaded
//! schedule.
//!
//! # Architecture
//!
//! ```text
//!  network worker task                        consumer context
//!  ┌──────────────────────────────────┐
//!  │ ReconnectSupervisor              │
//!  │   └─ ConnectionManager           │      ┌───────────────┐
//!  │        └─ Transport ─ decode ────┼─────►│ BatchReceiver │
//!  │                        (batches) │ mpsc │   .drain()    │
//!  └──────────────┬───────────────────┘      └───────────────┘
//!                 │ set()
//!          ┌──────▼──────────┐
//!          │ StatusPublisher │◄─ get() / subscribe() (UI, host)
//!          └─────────────────┘
//! ```
//!
//! The connection manager runs the connect → await-first-data →
//! running state machine with two timeout policies (first data,
//! inactivity); the supervisor decides whether a terminated connection
//! is retried. A single `CancellationToken` is the cooperative stop
//! flag, checked at every poll boundary.
//!
//! # Components
//!
//! - [`config`] - `ListenerConfig` and endpoint defaults
//! - [`state`] - `LifecycleState` and `TerminationReason`
//! - [`status`] - `StatusPublisher` for lock-free state observation
//! - [`decode`] - frame decoding into `PositionUpdate` batches
//! - [`channel`] - the handoff channel between network and consumer
//! - [`transport`] - the `Transport` trait plus UDP/TCP variants
//! - [`manager`] - `ConnectionManager`, one connection attempt
//! - [`supervisor`] - `ReconnectSupervisor`, retry policy
//! - [`listener`] - `Listener` facade: `start` / `stop` / `status`

pub mod channel;
pub mod config;
pub mod decode;
pub mod listener;
pub mod manager;
pub mod state;
pub mod status;
pub mod supervisor;
pub mod transport;

pub use channel::{handoff_channel, BatchReceiver, BatchSender};
pub use config::ListenerConfig;
pub use decode::{decode_frame, Batch, FrameFormat, PositionUpdate, DEFAULT_TARGET_ID};
pub use listener::Listener;
pub use manager::ConnectionManager;
pub use state::{LifecycleState, TerminationReason};
pub use status::StatusPublisher;
pub use supervisor::ReconnectSupervisor;
pub use transport::{
    DatagramTransport, Frame, StreamTransport, Transport, TransportError, TransportKind,
};

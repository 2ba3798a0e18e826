//! TrackBridge - streams object-position updates from a network peer
//! into a single-threaded scene consumer.
//!
//! A remote peer sends position frames over UDP (one JSON array per
//! datagram) or TCP (one JSON object per line). The bridge decodes each
//! frame into a batch of [`tracker::PositionUpdate`] records and hands
//! batches to the consumer over a thread-safe channel, so the consumer
//! can apply them on its own schedule without ever being touched from
//! the network side.
//!
//! # High-Level API
//!
//! The [`tracker::Listener`] facade is the entry point:
//!
//! ```ignore
//! use trackbridge::tracker::{Listener, ListenerConfig};
//!
//! let mut listener = Listener::new();
//! let rx = listener.start(ListenerConfig::datagram(9999)).unwrap();
//!
//! // On the consumer's own tick:
//! for batch in rx.drain() {
//!     scene.apply_batch(&batch);
//! }
//!
//! listener.stop().await;
//! ```

pub mod logging;
pub mod scene;
pub mod tracker;

/// Version of the TrackBridge library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

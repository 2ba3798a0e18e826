//! Configuration for a listener session.

use std::time::Duration;

use crate::tracker::transport::TransportKind;

/// Default host for both transport variants (peer on the same machine).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the datagram (UDP) variant.
pub const DEFAULT_DATAGRAM_PORT: u16 = 9999;

/// Default port for the stream (TCP) variant.
pub const DEFAULT_STREAM_PORT: u16 = 8765;

/// Default bounded wait per receive attempt (the poll quantum).
pub const DEFAULT_POLL_QUANTUM: Duration = Duration::from_millis(250);

/// Default time allowed for the first frame to arrive after connect.
pub const DEFAULT_FIRST_DATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Default silence duration after which a live peer is considered dead.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between reconnect attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Configuration for one listener session.
///
/// Immutable for the lifetime of the session; read by the connection
/// manager and the reconnect supervisor.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Which transport variant to use.
    pub transport: TransportKind,

    /// Peer host (stream variant) or local bind address (datagram variant).
    pub host: String,

    /// Port to connect to / bind on.
    pub port: u16,

    /// Maximum time to wait for the first frame while `Connecting`.
    pub first_data_timeout: Duration,

    /// Maximum silence while `Running` before the peer is declared dead.
    pub inactivity_timeout: Duration,

    /// Whether to retry after a failure that is not a user stop.
    pub reconnect_enabled: bool,

    /// How long to wait between reconnect attempts.
    pub reconnect_delay: Duration,

    /// Bounded wait per receive attempt. Stop requests and timeout
    /// re-evaluation happen at most one quantum late.
    pub poll_quantum: Duration,
}

impl ListenerConfig {
    /// Config for the datagram variant on the default loopback host.
    pub fn datagram(port: u16) -> Self {
        Self {
            transport: TransportKind::Datagram,
            port,
            ..Self::default()
        }
    }

    /// Config for the stream variant on the default loopback host.
    pub fn stream(port: u16) -> Self {
        Self {
            transport: TransportKind::Stream,
            port,
            ..Self::default()
        }
    }

    /// Enable or disable automatic reconnect.
    pub fn with_reconnect(mut self, enabled: bool) -> Self {
        self.reconnect_enabled = enabled;
        self
    }

    /// Override the poll quantum (mainly for tests with tight timing).
    pub fn with_poll_quantum(mut self, quantum: Duration) -> Self {
        self.poll_quantum = quantum;
        self
    }

    /// The socket address string for the configured endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Datagram,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_DATAGRAM_PORT,
            first_data_timeout: DEFAULT_FIRST_DATA_TIMEOUT,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            reconnect_enabled: false,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            poll_quantum: DEFAULT_POLL_QUANTUM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ListenerConfig::default();
        assert_eq!(config.transport, TransportKind::Datagram);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9999);
        assert!(!config.reconnect_enabled);
        assert_eq!(config.reconnect_delay, Duration::from_secs(2));
        assert_eq!(config.poll_quantum, Duration::from_millis(250));
    }

    #[test]
    fn test_stream_config() {
        let config = ListenerConfig::stream(DEFAULT_STREAM_PORT);
        assert_eq!(config.transport, TransportKind::Stream);
        assert_eq!(config.endpoint(), "127.0.0.1:8765");
    }

    #[test]
    fn test_builder_helpers() {
        let config = ListenerConfig::datagram(9999)
            .with_reconnect(true)
            .with_poll_quantum(Duration::from_millis(10));
        assert!(config.reconnect_enabled);
        assert_eq!(config.poll_quantum, Duration::from_millis(10));
    }
}

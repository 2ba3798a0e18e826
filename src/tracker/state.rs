//! Core lifecycle types for the tracker bridge.
//!
//! - [`LifecycleState`] - What is the listener session doing right now?
//! - [`TerminationReason`] - Why did one connection attempt end?

/// Lifecycle state of a listener session.
///
/// Exactly one value exists per session, written by the connection
/// manager and supervisor, read by observers through the status
/// publisher. Transitions are strictly ordered:
/// `Stopped → Connecting → Running` or `Stopped → Connecting → Stopped`,
/// never skipping `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No session active, or the session has fully terminated.
    #[default]
    Stopped,
    /// The transport is open (or opening) but no frame has arrived yet.
    Connecting,
    /// At least one frame has arrived and the peer is considered live.
    Running,
}

impl LifecycleState {
    /// Encode for atomic storage.
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Connecting => 1,
            Self::Running => 2,
        }
    }

    /// Decode from atomic storage. Unknown values map to `Stopped`.
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Running => write!(f, "Running"),
        }
    }
}

/// Why a single connection attempt ended.
///
/// Returned by the connection manager; the supervisor inspects this to
/// decide whether to retry. `UserStop` always wins over reconnect
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// No frame arrived within `first_data_timeout` while `Connecting`.
    ConnectTimeout,
    /// No frame arrived within `inactivity_timeout` while `Running`.
    Inactivity,
    /// A stop was requested; never followed by a reconnect attempt.
    UserStop,
    /// The transport failed (refused, reset, broken pipe, bind error).
    TransportError,
}

impl TerminationReason {
    /// Whether the supervisor may retry after this termination.
    ///
    /// Only a user-initiated stop is non-retryable; every other reason
    /// is a session-level failure eligible for reconnect.
    pub fn is_retryable(self) -> bool {
        self != Self::UserStop
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectTimeout => write!(f, "connect timeout"),
            Self::Inactivity => write!(f, "inactivity timeout"),
            Self::UserStop => write!(f, "user stop"),
            Self::TransportError => write!(f, "transport error"),
        }
    }
}

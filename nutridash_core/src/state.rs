use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Whether the listener currently holds an open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writer side, owned by the listener.
pub type StateSender = watch::Sender<ConnectionState>;

/// Reader side, cloned into every status-reporting surface.
pub type StateReceiver = watch::Receiver<ConnectionState>;

/// Create the state channel, starting out disconnected.
#[must_use]
pub fn connection_state_channel() -> (StateSender, StateReceiver) {
    watch::channel(ConnectionState::Disconnected)
}

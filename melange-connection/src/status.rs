use serde::{Deserialize, Serialize};

/// Backend reachability as seen by the monitor. Drives the status
/// indicator and the retry cadence, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Initializing,
    Connected,
    Disconnected,
    Reconnecting,
    Error,
}

/// Why the monitor is in its current status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionReason {
    Initial,
    Network,
    Auth,
    Db,
    Timeout,
    Unknown,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Initializing => "initializing",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Error => "error",
        }
    }
}

impl ConnectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionReason::Initial => "initial",
            ConnectionReason::Network => "network",
            ConnectionReason::Auth => "auth",
            ConnectionReason::Db => "db",
            ConnectionReason::Timeout => "timeout",
            ConnectionReason::Unknown => "unknown",
        }
    }
}

/// A point-in-time view of the monitor state, handed to observers and
/// returned by the health endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub status: ConnectionStatus,
    pub reason: ConnectionReason,
}

impl ConnectionSnapshot {
    pub fn is_connected(self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

// Network interface models

use serde::{Deserialize, Serialize};

/// One cumulative reading of an interface's byte counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteCounters {
    pub received: u64,
    pub sent: u64,
}

impl ByteCounters {
    pub fn new(received: u64, sent: u64) -> Self {
        Self { received, sent }
    }
}

/// Link type as reported by the OS; serializes to lowercase JSON (e.g. "wireless").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Ethernet,
    Wireless,
    Loopback,
    Tunnel,
    #[serde(other)]
    Other,
}

impl InterfaceKind {
    /// Selection priority, lower wins: ethernet, then wireless, then anything else.
    pub fn priority(self) -> u8 {
        match self {
            InterfaceKind::Ethernet => 0,
            InterfaceKind::Wireless => 1,
            _ => 2,
        }
    }

    /// Loopback and tunnel links never carry the traffic we want to show.
    pub fn is_monitorable(self) -> bool {
        !matches!(self, InterfaceKind::Loopback | InterfaceKind::Tunnel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperStatus {
    Up,
    Down,
    #[serde(other)]
    Unknown,
}

impl OperStatus {
    /// Parse a Linux `operstate` value (e.g. "up", "dormant").
    pub fn from_operstate(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "up" => OperStatus::Up,
            "down" | "lowerlayerdown" | "notpresent" | "dormant" => OperStatus::Down,
            _ => OperStatus::Unknown,
        }
    }
}

/// One row of the interface enumeration query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub kind: InterfaceKind,
    pub status: OperStatus,
    pub counters: ByteCounters,
}

impl InterfaceInfo {
    pub fn handle(&self) -> InterfaceHandle {
        InterfaceHandle {
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// Reference to the interface the sampler is currently reading. The OS stays the
/// source of truth; every read through a handle may fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceHandle {
    pub name: String,
    pub kind: InterfaceKind,
}

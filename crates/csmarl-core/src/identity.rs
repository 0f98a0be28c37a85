//! Node identity
//!
//! A node is identified by its insertion index in the topology graph, so
//! [`NodeId`] is a thin wrapper around `u32`. Flows and edges refer to nodes
//! through these ids.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Index of a node in a topology graph (0..N-1)
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display("n{_0}")]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the underlying index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Transmitter node of the `k`-th link (or flow) in a paired layout
    pub fn transmitter(k: u32) -> Self {
        Self(k * 2)
    }

    /// Receiver node of the `k`-th link (or flow) in a paired layout
    pub fn receiver(k: u32) -> Self {
        Self(k * 2 + 1)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An ordered (sender, receiver) pair describing one traffic demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flow {
    pub sender: NodeId,
    pub receiver: NodeId,
}

impl Flow {
    pub fn new(sender: NodeId, receiver: NodeId) -> Self {
        Self { sender, receiver }
    }

    /// True if sender and receiver are the same node
    pub fn is_self_pair(&self) -> bool {
        self.sender == self.receiver
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.sender, self.receiver)
    }
}

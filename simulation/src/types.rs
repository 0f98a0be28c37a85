//! Core types for csmarl topologies
//!
//! Node positions, interference edges and the two configuration selectors
//! (layout and loss model) that decide how a topology is built.

use std::fmt;
use std::str::FromStr;

use csmarl_core::{ConfigError, NodeId};
use serde::{Deserialize, Serialize};

/// Loss in dB installed for an interference edge: the endpoints hear each
/// other with no additional attenuation
pub const CONNECTED_LOSS_DB: f64 = 0.0;

/// A 2D node position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// An interference edge between two nodes
///
/// Edges are unordered: `(a, b)` and `(b, a)` are the same edge. The
/// endpoints are stored normalized so that `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    /// Extra loss between the endpoints
    pub loss_db: f64,
}

impl Edge {
    pub fn new(a: NodeId, b: NodeId, loss_db: f64) -> Self {
        let (a, b) = Self::key(a, b);
        Self { a, b, loss_db }
    }

    /// Normalized key of the unordered pair
    pub fn key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// True if `node` is one of the endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }
}

/// Topology schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Arbitrary node positions, edges and flows
    Node,
    /// Co-located transmitter/receiver pairs, one per link
    #[default]
    Link,
}

impl Layout {
    /// Directory name under the graphs root
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Node => "node",
            Layout::Link => "link",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Layout::Node),
            "link" => Ok(Layout::Link),
            other => Err(ConfigError::UnknownLayout(other.to_string())),
        }
    }
}

/// How interference is modeled on the channel
///
/// Names other than `graph` and `geometric` are kept as [`LossModel::Other`]
/// so that a run using a channel-side loss model still loads; no topology
/// graph is built for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LossModel {
    /// Interference follows the edges of a topology file
    #[default]
    Graph,
    /// Random placement; loss is computed from distance elsewhere
    Geometric,
    /// Any other channel-side model
    Other(String),
}

impl LossModel {
    pub fn as_str(&self) -> &str {
        match self {
            LossModel::Graph => "graph",
            LossModel::Geometric => "geometric",
            LossModel::Other(name) => name,
        }
    }
}

impl From<String> for LossModel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "graph" => LossModel::Graph,
            "geometric" => LossModel::Geometric,
            _ => LossModel::Other(value),
        }
    }
}

impl From<LossModel> for String {
    fn from(value: LossModel) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for LossModel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LossModel::from(s.to_string()))
    }
}

impl fmt::Display for LossModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

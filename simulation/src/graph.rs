//! Interference graph model
//!
//! A [`GraphBuilder`] is mutated while a topology is constructed; calling
//! [`GraphBuilder::build`] consumes it and yields an immutable [`Graph`] that
//! is handed to the interference binder and to flow installation.
//!
//! Node ids are insertion indices, so the order of `add_node` calls matters.
//! Edges and flows must only reference nodes that exist; this is a
//! precondition of the builder, checked by the file readers instead.

use std::collections::BTreeMap;

use csmarl_core::{Flow, NodeId};

use crate::types::{CONNECTED_LOSS_DB, Edge, Position};

/// Mutable graph under construction
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    positions: Vec<Position>,
    edges: BTreeMap<(NodeId, NodeId), Edge>,
    flows: Vec<Flow>,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node at `(x, y)` and return its id
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        self.add_node_at(Position::new(x, y))
    }

    /// Append a node at `position` and return its id
    pub fn add_node_at(&mut self, position: Position) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(position);
        id
    }

    /// Add an interference edge with no extra loss
    ///
    /// Returns true iff the unordered pair was not already present.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        self.add_edge_with_loss(a, b, CONNECTED_LOSS_DB)
    }

    /// Add an interference edge carrying a specific loss value
    ///
    /// A duplicate insertion keeps the first edge and its loss.
    pub fn add_edge_with_loss(&mut self, a: NodeId, b: NodeId, loss_db: f64) -> bool {
        match self.edges.entry(Edge::key(a, b)) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(Edge::new(a, b, loss_db));
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Register a (sender, receiver) flow; duplicates and self-pairs are kept
    pub fn add_flow(&mut self, sender: NodeId, receiver: NodeId) {
        self.flows.push(Flow::new(sender, receiver));
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Freeze the graph
    pub fn build(self) -> Graph {
        Graph {
            positions: self.positions,
            edges: self.edges,
            flows: self.flows,
        }
    }
}

/// Immutable interference topology
#[derive(Debug, Clone, Default)]
pub struct Graph {
    positions: Vec<Position>,
    edges: BTreeMap<(NodeId, NodeId), Edge>,
    flows: Vec<Flow>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Node positions, indexed by node id
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Position of a node, `None` if the id is out of range
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.positions.get(node.index()).copied()
    }

    /// Edges in ascending order of their normalized endpoints
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Flows in registration order
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Check whether two nodes share an edge (in either order)
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains_key(&Edge::key(a, b))
    }

    /// Nodes sharing an edge with `node`
    pub fn interferers(&self, node: NodeId) -> Vec<NodeId> {
        self.edges
            .values()
            .filter(|edge| edge.touches(node))
            .map(|edge| if edge.a == node { edge.b } else { edge.a })
            .collect()
    }

    /// Print a simple ASCII summary of the graph
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        output.push_str("Interference Topology:\n");
        output.push_str(&format!("  Nodes: {}\n", self.node_count()));
        output.push_str(&format!("  Edges: {}\n", self.edge_count()));
        output.push_str(&format!("  Flows: {}\n\n", self.flow_count()));

        for (i, position) in self.positions.iter().enumerate() {
            let node = NodeId(i as u32);
            let neighbors: Vec<String> =
                self.interferers(node).iter().map(|n| n.to_string()).collect();
            output.push_str(&format!(
                "  {} {} -> [{}]\n",
                node,
                position,
                neighbors.join(", ")
            ));
        }

        if !self.flows.is_empty() {
            output.push('\n');
            for (i, flow) in self.flows.iter().enumerate() {
                output.push_str(&format!("  flow {}: {}\n", i, flow));
            }
        }
        output
    }
}

//! Interference binding
//!
//! Turns the edges of a built [`Graph`] into a symmetric pairwise loss table
//! and attaches it to a propagation channel. An edge means "these two
//! endpoints hear each other"; every pair without an edge falls back to the
//! table's default loss, which is infinite (disconnected).

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use csmarl_core::{BindError, MobilityResolver, NodeId, PropagationChannel, PropagationLoss};
use tracing::{debug, info};

use crate::graph::Graph;
use crate::types::Position;

/// Symmetric pairwise loss table
#[derive(Debug, Clone)]
pub struct MatrixPropagationLoss<H: Eq + Hash> {
    default_loss_db: f64,
    losses: HashMap<(H, H), f64>,
}

impl<H: Clone + Eq + Hash> MatrixPropagationLoss<H> {
    /// Create a table where unlisted pairs are disconnected
    pub fn new() -> Self {
        Self::with_default(f64::INFINITY)
    }

    /// Create a table with a specific loss for unlisted pairs
    pub fn with_default(default_loss_db: f64) -> Self {
        Self {
            default_loss_db,
            losses: HashMap::new(),
        }
    }

    /// Set the loss between `a` and `b` in both directions
    pub fn set_loss(&mut self, a: H, b: H, loss_db: f64) {
        self.losses.insert((a.clone(), b.clone()), loss_db);
        self.losses.insert((b, a), loss_db);
    }

    /// Loss between `a` and `b`, or the default
    pub fn get_loss(&self, a: &H, b: &H) -> f64 {
        self.losses
            .get(&(a.clone(), b.clone()))
            .copied()
            .unwrap_or(self.default_loss_db)
    }

    /// Number of unordered pairs with an explicit entry (self-pairs count once)
    pub fn pair_count(&self) -> usize {
        let self_pairs = self.losses.keys().filter(|(a, b)| a == b).count();
        (self.losses.len() - self_pairs) / 2 + self_pairs
    }
}

impl<H: Clone + Eq + Hash> Default for MatrixPropagationLoss<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone + Eq + Hash + Debug> PropagationLoss<H> for MatrixPropagationLoss<H> {
    fn loss_db(&self, a: &H, b: &H) -> f64 {
        self.get_loss(a, b)
    }
}

/// Install one symmetric loss entry per graph edge and attach the table to
/// `channel`
///
/// The loss of each entry is taken from the edge. Returns the number of
/// edges bound.
///
/// # Errors
///
/// Fails without touching the channel if an edge endpoint has no mobility
/// handle.
pub fn configure_matrix_topology<C, R>(
    channel: &mut C,
    graph: &Graph,
    resolver: &R,
) -> Result<usize, BindError>
where
    R: MobilityResolver,
    R::Handle: 'static,
    C: PropagationChannel<R::Handle>,
{
    let mut model = MatrixPropagationLoss::new();

    for edge in graph.edges() {
        let a = resolver.resolve(edge.a).ok_or(BindError::UnresolvedNode(edge.a))?;
        let b = resolver.resolve(edge.b).ok_or(BindError::UnresolvedNode(edge.b))?;
        debug!(a = %edge.a, b = %edge.b, loss_db = edge.loss_db, "binding edge");
        model.set_loss(a, b, edge.loss_db);
    }

    let bound = graph.edge_count();
    channel.add_propagation_loss(Box::new(model));
    info!(edges = bound, "interference matrix attached to channel");
    Ok(bound)
}

/// Mobility handle of a statically placed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobilityId(pub u32);

/// Fixed node positions, one mobility model per graph node
#[derive(Debug, Clone, Default)]
pub struct StaticMobility {
    positions: Vec<Position>,
}

impl StaticMobility {
    /// One static mobility model per graph node, at the node's position
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            positions: graph.positions().to_vec(),
        }
    }

    pub fn position(&self, handle: MobilityId) -> Option<Position> {
        self.positions.get(handle.0 as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl MobilityResolver for StaticMobility {
    type Handle = MobilityId;

    fn resolve(&self, node: NodeId) -> Option<MobilityId> {
        (node.index() < self.positions.len()).then_some(MobilityId(node.0))
    }
}

/// A channel that sums the loss of every attached model
#[derive(Debug)]
pub struct SimChannel<H> {
    models: Vec<Box<dyn PropagationLoss<H>>>,
}

impl<H> SimChannel<H> {
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Total loss between `a` and `b`; zero when no model is attached
    pub fn loss_between(&self, a: &H, b: &H) -> f64 {
        self.models.iter().map(|model| model.loss_db(a, b)).sum()
    }

    /// True if the total loss between `a` and `b` is finite
    pub fn are_connected(&self, a: &H, b: &H) -> bool {
        self.loss_between(a, b).is_finite()
    }
}

impl<H> Default for SimChannel<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PropagationChannel<H> for SimChannel<H> {
    fn add_propagation_loss(&mut self, model: Box<dyn PropagationLoss<H>>) {
        self.models.push(model);
    }
}

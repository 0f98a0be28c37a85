//! Core traits for csmarl
//!
//! These traits are the seams between the simulation logic and the
//! collaborators it drives: the event scheduler, the mobility layer and the
//! propagation channel.
//!
//! ## Key Traits
//!
//! - [`Timer`]: Simulated clock with cancellable schedule-after-duration
//! - [`MobilityResolver`]: Maps a topology node to its mobility handle
//! - [`PropagationChannel`]: Accepts pairwise loss tables

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::event::{EventId, SimTime};
use crate::identity::NodeId;

/// Simulated clock that can schedule a callback on its owner
///
/// Implementations bind the scheduled event to whoever holds the timer, so a
/// traffic source only deals with delays and handles.
pub trait Timer {
    /// Current simulated time
    fn now(&self) -> SimTime;

    /// Schedule the owner to fire again after `delay`
    fn schedule(&mut self, delay: Duration) -> EventId;

    /// Cancel a scheduled event
    ///
    /// Idempotent: cancelling an event that already fired or was already
    /// cancelled is a no-op. Returns true if a pending event was removed.
    fn cancel(&mut self, id: EventId) -> bool;
}

/// Resolves topology nodes to the mobility handles a channel understands
pub trait MobilityResolver {
    /// Handle type understood by the propagation-loss model
    type Handle: Clone + Eq + Hash + Debug;

    /// Look up the mobility handle of a node, `None` if the node is unknown
    fn resolve(&self, node: NodeId) -> Option<Self::Handle>;
}

/// Pairwise propagation loss between two mobility handles
pub trait PropagationLoss<H>: Debug {
    /// Loss in dB between `a` and `b`, `f64::INFINITY` if they cannot hear
    /// each other
    fn loss_db(&self, a: &H, b: &H) -> f64;
}

/// A channel that propagation-loss models can be attached to
pub trait PropagationChannel<H> {
    /// Attach a loss model; later models are consulted after earlier ones
    fn add_propagation_loss(&mut self, model: Box<dyn PropagationLoss<H>>);
}

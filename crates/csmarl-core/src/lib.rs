//! # csmarl Core
//!
//! Core identifiers, errors, and collaborator traits for the csmarl wireless
//! interference simulator.
//!
//! The simulation crate builds interference topologies and drives them with
//! stochastic traffic. Everything it needs from the outside world (a clock
//! that can schedule callbacks, sockets to push payloads through, a way to
//! look up node mobility and a channel to attach loss models to) is declared
//! here as a narrow trait so it can be backed by the in-tree discrete-event
//! scheduler or by mocks in tests.
//!
//! ## Key Traits
//!
//! - [`Timer`]: Schedule-after-duration with cancellable handles
//! - [`PacketSocket`] / [`SocketFactory`]: Transport binding for traffic sources
//! - [`MobilityResolver`]: Node id to mobility handle lookup
//! - [`PropagationChannel`]: Sink for pairwise propagation-loss models
//!
//! ## Key Types
//!
//! - [`NodeId`]: Index of a node in a topology graph
//! - [`SimTime`]: Simulated time since the start of a run
//! - [`EventId`]: Handle of a scheduled event

pub mod error;
pub mod identity;
pub mod event;
pub mod traits;
pub mod transport;
pub mod mock_transport;

// Re-export main types
pub use error::*;
pub use identity::*;
pub use event::*;
pub use traits::*;
pub use transport::*;
pub use mock_transport::*;

//! # csmarl simulation
//!
//! Interference topologies and Markov-modulated traffic for wireless
//! channel-access experiments.
//!
//! ## Overview
//!
//! A run places transmitter/receiver pairs in the plane, decides which
//! endpoints hear each other, and drives bursty traffic over every pair:
//!
//! - **Interference graphs**: nodes with positions, undirected "can hear"
//!   edges, and sender → receiver flows
//! - **Two file layouts**: link files (one co-located pair per link) and
//!   node files (explicit nodes, edges and flows)
//! - **Geometric placement**: seeded random positions in the unit square
//! - **Interference binding**: every edge becomes a zero-loss entry of a
//!   symmetric loss matrix; every other pair stays disconnected
//! - **Markov traffic**: two modes with their own delay distributions,
//!   switching after a random modulation interval
//!
//! ## Architecture
//!
//! - **Types** (`types.rs`): positions, edges, layouts, loss models
//! - **Graph** (`graph.rs`): graph builder and frozen graph
//! - **Topology** (`topology.rs`): file readers/writers and geometric builder
//! - **Interference** (`interference.rs`): loss matrix, static mobility, channel
//! - **Random** (`random.rs`): distribution specs and seeded streams
//! - **Scheduler** (`scheduler.rs`): discrete-event clock
//! - **Traffic** (`traffic.rs`): Markov traffic generator
//! - **Simulation** (`simulation.rs`): end-to-end driver
//! - **Scenarios** (`scenarios.rs`): demo runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use csmarl_simulation::*;
//!
//! let mut config = SimConfig::default();
//! config.topology.loss_model = LossModel::Geometric;
//! config.topology.flow_count = 3;
//!
//! let mut sim = Simulation::new(config)?;
//! let stats = sim.run()?;
//! println!("{}", stats.summary());
//! ```

pub mod config;
pub mod graph;
pub mod interference;
pub mod random;
pub mod scenarios;
pub mod scheduler;
pub mod simulation;
pub mod topology;
pub mod traffic;
pub mod types;

#[cfg(test)]
mod integration_scenarios;

pub use config::SimConfig;

pub use graph::{Graph, GraphBuilder};

pub use types::{CONNECTED_LOSS_DB, Edge, Layout, LossModel, Position};

pub use topology::{
    TopologyConfig, build_graph, geometric_graph, parse_link_graph, parse_node_graph,
    read_link_graph, read_node_graph, save_topology, topology_path, write_topology,
};

pub use interference::{
    MatrixPropagationLoss, MobilityId, SimChannel, StaticMobility, configure_matrix_topology,
};

pub use random::{RandomStream, RandomVariable};

pub use scheduler::{Scheduler, ScopedTimer};

pub use traffic::{MarkovTrafficConfig, MarkovTrafficGenerator, TrafficMode, TrafficStats};

pub use simulation::{ChannelSocketFactory, FlowStats, SimStats, Simulation, Transmission};

// Re-export core types for integration
pub use csmarl_core::{CsmarlError, CsmarlResult, Flow, NodeId, SimTime};

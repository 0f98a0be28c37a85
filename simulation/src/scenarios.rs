//! Pre-defined demo scenarios
//!
//! Each scenario prints what it does and returns its result so tests and
//! the CLI can inspect it.

use std::fs;
use std::path::Path;

use csmarl_core::{CsmarlResult, NodeId, SimTime, TopologyError};
use tracing::info;

use crate::config::SimConfig;
use crate::graph::Graph;
use crate::random::RandomVariable;
use crate::scheduler::Scheduler;
use crate::simulation::{SimStats, Simulation};
use crate::topology::{TopologyConfig, build_graph, topology_path};
use crate::traffic::{MarkovTrafficConfig, MarkovTrafficGenerator, TrafficMode};
use crate::types::{Layout, LossModel};

/// Two links at distinct positions that interfere with each other
pub const TWO_LINK_TOPOLOGY: &str = "2\n0.0 0.0\n10.0 0.0\n1\n0 1\n";

/// Scenario A: read a two-link topology file and run traffic over it
///
/// ```text
/// link 0: n0 -> n1 at (0, 0)
/// link 1: n2 -> n3 at (10, 0)
/// links 0 and 1 interfere
/// ```
///
/// The file is written to `<graphs_dir>/link/two_links.txt` first.
pub fn run_link_file_scenario(graphs_dir: &Path) -> CsmarlResult<(Graph, SimStats)> {
    info!("=== Running Link File Scenario ===");

    let path = topology_path(graphs_dir, Layout::Link, "two_links");
    let io_err = |source| TopologyError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&path, TWO_LINK_TOPOLOGY).map_err(io_err)?;

    let config = SimConfig {
        sim_time: 5.0,
        topology: TopologyConfig {
            layout: Layout::Link,
            loss_model: LossModel::Graph,
            name: "two_links".to_string(),
            graphs_dir: graphs_dir.to_path_buf(),
            ..Default::default()
        },
        ..Default::default()
    };

    let mut sim = Simulation::new(config)?;
    println!("{}", sim.graph().visualize());

    let stats = sim.run()?;
    println!("\n=== Final Statistics ===");
    println!("{}", stats.summary());

    Ok((sim.graph().clone(), stats))
}

/// Scenario B: random geometric placement, node layout
///
/// Three flows, each endpoint placed independently in the unit square. No
/// interference edges exist, so nothing is received.
pub fn run_geometric_scenario(seed: u64) -> CsmarlResult<(Graph, SimStats)> {
    info!(seed, "=== Running Geometric Scenario ===");

    let config = SimConfig {
        sim_time: 3.0,
        topology: TopologyConfig {
            layout: Layout::Node,
            loss_model: LossModel::Geometric,
            flow_count: 3,
            graph_seed: seed,
            ..Default::default()
        },
        ..Default::default()
    };

    let graph = build_graph(&config.topology)?.ok_or_else(|| csmarl_core::CsmarlError::NoGraph {
        loss_model: config.topology.loss_model.to_string(),
    })?;
    println!("{}", graph.visualize());

    let mut sim = Simulation::with_graph(config, graph)?;
    let stats = sim.run()?;
    println!("\n=== Final Statistics ===");
    println!("{}", stats.summary());

    Ok((sim.graph().clone(), stats))
}

/// Scenario C: watch a single generator switch modes
///
/// Mode 1 sends every second, mode 2 every two seconds, and each mode lasts
/// at least five seconds. Activation flips to mode 2 at once. Returns
/// `(time, mode)` after every firing up to `until`.
pub fn run_mode_switch_scenario(until: SimTime) -> CsmarlResult<Vec<(SimTime, TrafficMode)>> {
    info!("=== Running Mode Switch Scenario ===");

    let config = MarkovTrafficConfig {
        mode1_delay: RandomVariable::constant(1.0),
        mode2_delay: RandomVariable::constant(2.0),
        modulation_interval: RandomVariable::constant(5.0),
        packet_size: RandomVariable::constant(200.0),
        ..Default::default()
    };
    let flow = csmarl_core::Flow::new(NodeId(0), NodeId(1));
    let mut generator = MarkovTrafficGenerator::new(&config, flow, 0, 1)?;
    let mut sockets = csmarl_core::MockSocketFactory::new();
    let mut scheduler = Scheduler::new();
    let mut trace = Vec::new();

    generator.start(&mut scheduler.timer_for(()), &mut sockets)?;
    while let Some(mode) = generator.mode() {
        let now = scheduler.now();
        if trace.last().is_none_or(|(_, last)| *last != mode) {
            println!("  t={}  mode {}", now, mode.number());
        }
        trace.push((now, mode));

        if scheduler.peek_time().is_none_or(|time| time > until) {
            break;
        }
        scheduler.pop();
        generator.fire(&mut scheduler.timer_for(()))?;
    }
    generator.stop(&mut scheduler.timer_for(()));

    println!("\n=== Final Statistics ===");
    let stats = generator.stats();
    println!("  Firings: {}", stats.firings);
    println!("  Packets sent: {}", stats.packets_sent);
    println!("  Mode switches: {}", stats.mode_switches);

    Ok(trace)
}

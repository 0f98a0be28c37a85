//! Integration scenarios exercising the full stack
//!
//! These scenarios go from topology files and configs through interference
//! binding to traffic generation:
//! - link-layout file → graph → channel → received traffic
//! - seeded geometric placement → reproducible graph → silent channel
//! - Markov mode switching observed through a complete run

use std::fs;
use std::path::Path;

use csmarl_core::{CsmarlError, MobilityResolver, NodeId, SimTime, TopologyError};

use crate::config::SimConfig;
use crate::interference::{SimChannel, StaticMobility, configure_matrix_topology};
use crate::random::RandomVariable;
use crate::simulation::Simulation;
use crate::topology::{
    TopologyConfig, build_graph, geometric_graph, read_link_graph, read_node_graph, save_topology,
    topology_path,
};
use crate::types::{Layout, LossModel};

fn write_graph(dir: &Path, layout: Layout, name: &str, content: &str) {
    let path = topology_path(dir, layout, name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn graph_config(dir: &Path, layout: Layout, name: &str) -> TopologyConfig {
    TopologyConfig {
        layout,
        loss_model: LossModel::Graph,
        name: name.to_string(),
        graphs_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

/// Two interfering links read from a file
#[test]
fn test_scenario_link_file() {
    let dir = tempfile::tempdir().unwrap();
    write_graph(dir.path(), Layout::Link, "fim", "2\n0 0\n7.5 2\n1\n0 1\n");

    let config = graph_config(dir.path(), Layout::Link, "fim");
    let graph = build_graph(&config).unwrap().unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.flow_count(), 2);
    assert_eq!(graph.position(NodeId(2)), graph.position(NodeId(3)));

    // bind and check the channel view of every pair
    let mobility = StaticMobility::from_graph(&graph);
    let mut channel = SimChannel::new();
    assert_eq!(configure_matrix_topology(&mut channel, &graph, &mobility).unwrap(), 5);
    let handle = |n| mobility.resolve(NodeId(n)).unwrap();
    for a in 0..4 {
        for b in 0..4 {
            if a != b {
                // {0,1} and {2,3} are both links and interfere pairwise
                assert!(channel.are_connected(&handle(a), &handle(b)));
            }
        }
    }

    let mut sim = Simulation::new(SimConfig {
        sim_time: 3.0,
        topology: config,
        ..Default::default()
    })
    .unwrap();
    let stats = sim.run().unwrap();
    assert_eq!(stats.flows.len(), 2);
    assert_eq!(stats.packets_sent(), 8);
    assert_eq!(stats.packets_received(), 8);
    assert_eq!(stats.bytes_sent(), 8 * 2000);
}

/// Links without interference only hear themselves
#[test]
fn test_scenario_isolated_links() {
    let dir = tempfile::tempdir().unwrap();
    write_graph(dir.path(), Layout::Link, "solo", "3\n0 0\n1 0\n2 0\n0\n");

    let graph = read_link_graph(&topology_path(dir.path(), Layout::Link, "solo")).unwrap();
    assert_eq!(graph.edge_count(), 3);
    assert!(graph.has_edge(NodeId(4), NodeId(5)));
    assert!(!graph.has_edge(NodeId(1), NodeId(2)));
    assert_eq!(graph.interferers(NodeId(0)), vec![NodeId(1)]);
}

/// A node-layout file is taken verbatim, including cross flows
#[test]
fn test_scenario_node_file() {
    let dir = tempfile::tempdir().unwrap();
    write_graph(
        dir.path(),
        Layout::Node,
        "cross",
        "4\n0 0\n1 0\n0 1\n1 1\n3\n0 1\n1 0\n2 3\n2\n0 3\n2 1\n",
    );

    let config = graph_config(dir.path(), Layout::Node, "cross");
    let graph = read_node_graph(&config.path()).unwrap();
    assert_eq!(graph.node_count(), 4);
    // (0,1) and (1,0) are one undirected edge
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.flow_count(), 2);

    // neither flow has an edge between its endpoints
    let stats = Simulation::with_graph(
        SimConfig {
            sim_time: 1.0,
            topology: config,
            ..Default::default()
        },
        graph,
    )
    .unwrap()
    .run()
    .unwrap();
    assert_eq!(stats.packets_sent(), 4);
    assert_eq!(stats.packets_received(), 0);
}

/// Seeded geometric placement is reproducible and edge-free
#[test]
fn test_scenario_geometric_reproducible() {
    let config = TopologyConfig {
        layout: Layout::Node,
        loss_model: LossModel::Geometric,
        flow_count: 3,
        graph_seed: 1234,
        ..Default::default()
    };
    let first = build_graph(&config).unwrap().unwrap();
    let second = build_graph(&config).unwrap().unwrap();

    assert_eq!(first.node_count(), 6);
    assert_eq!(first.edge_count(), 0);
    assert_eq!(first.flow_count(), 3);
    assert_eq!(first.positions(), second.positions());
    assert!(
        first
            .positions()
            .iter()
            .all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y))
    );

    let other = geometric_graph(Layout::Node, 3, 4321);
    assert_ne!(first.positions(), other.positions());
}

/// A generated topology can be saved and read back as a file
#[test]
fn test_scenario_generate_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let graph = geometric_graph(Layout::Node, 2, 9);
    let path = topology_path(dir.path(), Layout::Node, "generated");
    save_topology(&graph, Layout::Node, &path).unwrap();

    let reread = read_node_graph(&path).unwrap();
    assert_eq!(reread.node_count(), 4);
    assert_eq!(reread.flows(), graph.flows());
    for (a, b) in reread.positions().iter().zip(graph.positions()) {
        assert!((a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);
    }
}

/// Missing files abort, other loss models yield no graph
#[test]
fn test_scenario_missing_and_foreign_topologies() {
    let dir = tempfile::tempdir().unwrap();

    let config = graph_config(dir.path(), Layout::Link, "absent");
    let err = build_graph(&config).unwrap_err();
    assert!(matches!(err, TopologyError::Io { ref path, .. } if path.ends_with("link/absent.txt")));

    let config = TopologyConfig {
        loss_model: LossModel::Other("range".into()),
        ..config
    };
    assert!(build_graph(&config).unwrap().is_none());
    let err = Simulation::new(SimConfig {
        topology: config,
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, CsmarlError::NoGraph { .. }));
}

/// Mode switching seen through a complete run
#[test]
fn test_scenario_mode_switching() {
    let dir = tempfile::tempdir().unwrap();
    write_graph(dir.path(), Layout::Link, "one", "1\n0 0\n0\n");

    let mut config = SimConfig {
        sim_time: 14.0,
        topology: graph_config(dir.path(), Layout::Link, "one"),
        ..Default::default()
    };
    config.traffic.mode1_delay = RandomVariable::constant(1.0);
    config.traffic.mode2_delay = RandomVariable::constant(2.0);
    config.traffic.modulation_interval = RandomVariable::constant(5.0);

    let mut sim = Simulation::new(config).unwrap();
    let stats = sim.run().unwrap();
    let flow = &stats.flows[0];

    // mode 2 at t = 0, 2, 4; mode 1 at t = 6..10; mode 2 at t = 11, 13
    assert_eq!(flow.traffic.packets_sent, 10);
    assert_eq!(flow.traffic.mode_switches, 3);
    assert_eq!(flow.packets_received, 10);
    assert_eq!(sim.now(), SimTime::from_secs(14));
}

/// Config files drive a run end to end
#[test]
fn test_scenario_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_graph(dir.path(), Layout::Link, "fim", "2\n0 0\n5 5\n1\n0 1\n");

    let config_path = dir.path().join("run.toml");
    fs::write(
        &config_path,
        format!(
            r#"
sim_time = 2.0
seed = 3

[topology]
graphs_dir = "{}"

[traffic]
mode1_delay = "exponential:0.1"
packet_size = "uniform:20,1500"
"#,
            dir.path().display()
        ),
    )
    .unwrap();

    let config = SimConfig::from_toml_file(&config_path).unwrap();
    let first = Simulation::new(config.clone()).unwrap().run().unwrap();
    let second = Simulation::new(config).unwrap().run().unwrap();

    assert_eq!(first, second);
    assert!(first.packets_sent() > 2);
    assert_eq!(first.packets_received(), first.packets_sent());
}

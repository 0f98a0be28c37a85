//! Topology construction for csmarl
//!
//! Builds an interference [`Graph`] from one of three sources:
//! - Link-layout files: one co-located transmitter/receiver pair per link,
//!   interference given between link indices
//! - Node-layout files: positions, edges and flows given node by node
//! - Random geometric placement in the unit square (no edges)
//!
//! Topology files are whitespace-separated numbers and live at
//! `<graphs_dir>/<layout>/<name>.txt`:
//!
//! ```text
//! link layout:  L  (x y) * L   M  (i j) * M
//! node layout:  N  (x y) * N   M  (a b) * M   F  (a b) * F
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csmarl_core::{NodeId, TopologyError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::graph::{Graph, GraphBuilder};
use crate::types::{Layout, LossModel};

/// Topology selection for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// File schema / endpoint placement policy
    pub layout: Layout,
    /// Interference model; selects the builder
    pub loss_model: LossModel,
    /// File name (without extension) under `<graphs_dir>/<layout>/`
    pub name: String,
    /// Root directory of topology files
    pub graphs_dir: PathBuf,
    /// Number of flows for the geometric builder
    pub flow_count: u32,
    /// Seed for the geometric builder
    pub graph_seed: u64,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Link,
            loss_model: LossModel::Graph,
            name: "fim".to_string(),
            graphs_dir: PathBuf::from("graphs"),
            flow_count: 4,
            graph_seed: 0,
        }
    }
}

impl TopologyConfig {
    /// Path of the topology file this config selects
    pub fn path(&self) -> PathBuf {
        topology_path(&self.graphs_dir, self.layout, &self.name)
    }
}

/// `<graphs_dir>/<layout>/<name>.txt`
pub fn topology_path(graphs_dir: &Path, layout: Layout, name: &str) -> PathBuf {
    graphs_dir.join(layout.as_str()).join(format!("{}.txt", name))
}

/// Build the graph selected by `config`
///
/// Returns `Ok(None)` when the loss model does not use a topology graph;
/// callers must treat that as "no graph available". A missing or malformed
/// topology file is an error that should abort the run.
pub fn build_graph(config: &TopologyConfig) -> Result<Option<Graph>, TopologyError> {
    let graph = match &config.loss_model {
        LossModel::Graph => {
            let path = config.path();
            match config.layout {
                Layout::Node => read_node_graph(&path)?,
                Layout::Link => read_link_graph(&path)?,
            }
        }
        LossModel::Geometric => {
            geometric_graph(config.layout, config.flow_count, config.graph_seed)
        }
        LossModel::Other(name) => {
            warn!(loss_model = %name, "loss model does not use a topology graph");
            return Ok(None);
        }
    };

    info!(
        layout = %config.layout,
        loss_model = %config.loss_model,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        flows = graph.flow_count(),
        "topology built"
    );
    Ok(Some(graph))
}

/// Read a link-layout topology file
pub fn read_link_graph(path: &Path) -> Result<Graph, TopologyError> {
    let content = read_file(path)?;
    parse_link_graph(&content, path)
}

/// Read a node-layout topology file
pub fn read_node_graph(path: &Path) -> Result<Graph, TopologyError> {
    let content = read_file(path)?;
    parse_node_graph(&content, path)
}

fn read_file(path: &Path) -> Result<String, TopologyError> {
    fs::read_to_string(path).map_err(|source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse link-layout content; `source` is only used in diagnostics
///
/// Link `k` becomes transmitter node `2k` and receiver node `2k+1` at the
/// same position, joined by an edge and registered as one flow. Each
/// interfering link pair `(i, j)` adds the four edges between
/// `{tx_i, rx_i}` and `{tx_j, rx_j}`.
pub fn parse_link_graph(content: &str, source: &Path) -> Result<Graph, TopologyError> {
    let mut reader = TokenReader::new(content, source);
    let mut builder = GraphBuilder::new();

    let links = reader.count("link count")?;
    for k in 0..links {
        let x = reader.coordinate()?;
        let y = reader.coordinate()?;

        let tx = builder.add_node(x, y);
        let rx = builder.add_node(x, y);
        debug_assert_eq!((tx, rx), (NodeId::transmitter(k), NodeId::receiver(k)));

        builder.add_edge(tx, rx);
        builder.add_flow(tx, rx);
    }

    let interferences = reader.count("interference count")?;
    for _ in 0..interferences {
        let (i, j) = reader.pair(links, "link index")?;
        for a in [NodeId::transmitter(i), NodeId::receiver(i)] {
            for b in [NodeId::transmitter(j), NodeId::receiver(j)] {
                builder.add_edge(a, b);
            }
        }
    }
    reader.finish();

    Ok(builder.build())
}

/// Parse node-layout content; `source` is only used in diagnostics
///
/// The file is authoritative: edges and flows are taken exactly as listed.
pub fn parse_node_graph(content: &str, source: &Path) -> Result<Graph, TopologyError> {
    let mut reader = TokenReader::new(content, source);
    let mut builder = GraphBuilder::new();

    let nodes = reader.count("node count")?;
    for _ in 0..nodes {
        let x = reader.coordinate()?;
        let y = reader.coordinate()?;
        builder.add_node(x, y);
    }

    let interferences = reader.count("interference count")?;
    for _ in 0..interferences {
        let (a, b) = reader.pair(nodes, "node id")?;
        builder.add_edge(NodeId(a), NodeId(b));
    }

    let flows = reader.count("flow count")?;
    for _ in 0..flows {
        let (a, b) = reader.pair(nodes, "node id")?;
        builder.add_flow(NodeId(a), NodeId(b));
    }
    reader.finish();

    Ok(builder.build())
}

/// Place `flow_count` flows uniformly at random in the unit square
///
/// Flow `i` uses nodes `2i` (sender) and `2i+1` (receiver). In link layout
/// both endpoints share one sampled position; in node layout each endpoint
/// is sampled independently. No edges are produced. The same seed always
/// yields the same positions.
pub fn geometric_graph(layout: Layout, flow_count: u32, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = GraphBuilder::new();

    for _ in 0..flow_count {
        let (x, y) = (rng.random::<f64>(), rng.random::<f64>());
        let tx = builder.add_node(x, y);
        let rx = match layout {
            Layout::Node => builder.add_node(rng.random::<f64>(), rng.random::<f64>()),
            Layout::Link => builder.add_node(x, y),
        };
        builder.add_flow(tx, rx);
    }

    builder.build()
}

/// Write `graph` in the file format of `layout`
///
/// For link layout the graph must have the paired shape produced by the
/// link builders (nodes `2k`/`2k+1` per link); link positions are taken
/// from the transmitters and interfering link pairs are recovered from the
/// edges joining different links.
pub fn write_topology<W: Write>(graph: &Graph, layout: Layout, out: &mut W) -> std::io::Result<()> {
    match layout {
        Layout::Link => {
            let links = graph.node_count() / 2;
            writeln!(out, "{}", links)?;
            for k in 0..links {
                let p = graph.positions()[k * 2];
                writeln!(out, "{} {}", p.x, p.y)?;
            }

            let pairs: BTreeSet<(u32, u32)> = graph
                .edges()
                .map(|edge| (edge.a.0 / 2, edge.b.0 / 2))
                .filter(|(i, j)| i != j)
                .collect();
            writeln!(out, "{}", pairs.len())?;
            for (i, j) in pairs {
                writeln!(out, "{} {}", i, j)?;
            }
        }
        Layout::Node => {
            writeln!(out, "{}", graph.node_count())?;
            for p in graph.positions() {
                writeln!(out, "{} {}", p.x, p.y)?;
            }
            writeln!(out, "{}", graph.edge_count())?;
            for edge in graph.edges() {
                writeln!(out, "{} {}", edge.a.0, edge.b.0)?;
            }
            writeln!(out, "{}", graph.flow_count())?;
            for flow in graph.flows() {
                writeln!(out, "{} {}", flow.sender.0, flow.receiver.0)?;
            }
        }
    }
    Ok(())
}

/// Write `graph` to `path`, creating parent directories
pub fn save_topology(graph: &Graph, layout: Layout, path: &Path) -> Result<(), TopologyError> {
    let io_err = |source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut buffer = Vec::new();
    write_topology(graph, layout, &mut buffer).map_err(io_err)?;
    fs::write(path, buffer).map_err(io_err)?;
    info!(path = %path.display(), layout = %layout, "topology saved");
    Ok(())
}

/// Sequential reader over whitespace-separated tokens
struct TokenReader<'a> {
    source: &'a Path,
    tokens: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> TokenReader<'a> {
    fn new(content: &'a str, source: &'a Path) -> Self {
        Self {
            source,
            tokens: content.split_whitespace(),
            position: 0,
        }
    }

    fn next_token(&mut self, expected: &'static str) -> Result<&'a str, TopologyError> {
        let token = self.tokens.next().ok_or_else(|| TopologyError::UnexpectedEof {
            path: self.source.to_path_buf(),
            expected,
        })?;
        self.position += 1;
        Ok(token)
    }

    fn parse_error(&self, expected: &'static str, found: &str) -> TopologyError {
        TopologyError::Parse {
            path: self.source.to_path_buf(),
            position: self.position,
            expected,
            found: found.to_string(),
        }
    }

    fn count(&mut self, expected: &'static str) -> Result<u32, TopologyError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| self.parse_error(expected, token))
    }

    fn coordinate(&mut self) -> Result<f64, TopologyError> {
        let token = self.next_token("coordinate")?;
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.parse_error("coordinate", token)),
        }
    }

    /// Read two ids, each required to be below `limit`
    fn pair(&mut self, limit: u32, expected: &'static str) -> Result<(u32, u32), TopologyError> {
        let a = self.id(limit, expected)?;
        let b = self.id(limit, expected)?;
        Ok((a, b))
    }

    fn id(&mut self, limit: u32, expected: &'static str) -> Result<u32, TopologyError> {
        let id = self.count(expected)?;
        if id >= limit {
            return Err(TopologyError::NodeOutOfRange {
                path: self.source.to_path_buf(),
                id,
                limit,
            });
        }
        Ok(id)
    }

    /// Trailing tokens are ignored, as the readers stop after the last count
    fn finish(mut self) {
        let trailing = self.tokens.by_ref().count();
        if trailing > 0 {
            debug!(path = %self.source.display(), trailing, "ignoring trailing tokens");
        }
    }
}

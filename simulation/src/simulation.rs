//! End-to-end simulation driver
//!
//! Wires the pieces of a run together:
//! - builds the topology graph selected by the config
//! - places one static mobility model per node and binds the interference
//!   edges into a [`SimChannel`]
//! - installs one Markov traffic generator per flow, sending from the flow's
//!   sender to its receiver over channel-backed sockets
//! - runs the discrete-event scheduler for the configured duration, then
//!   stops every generator
//!
//! A transmission is received when the channel's loss between sender and
//! receiver is finite, i.e. when the graph joins the two nodes.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use csmarl_core::{
    CsmarlError, CsmarlResult, Flow, MobilityResolver, NodeId, PacketSocket, SimTime,
    SocketFactory, TransportError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::graph::Graph;
use crate::interference::{MobilityId, SimChannel, StaticMobility, configure_matrix_topology};
use crate::scheduler::Scheduler;
use crate::topology::build_graph;
use crate::traffic::{MarkovTrafficGenerator, TrafficStats};

/// One packet handed to the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    pub from: NodeId,
    pub to: NodeId,
    pub size: usize,
    pub loss_db: f64,
    pub received: bool,
}

/// Shared state behind every channel socket
#[derive(Debug)]
struct ChannelLink {
    mobility: StaticMobility,
    channel: SimChannel<MobilityId>,
    log: RefCell<Vec<Transmission>>,
}

/// Creates sockets that transmit over a bound [`SimChannel`]
#[derive(Debug, Clone)]
pub struct ChannelSocketFactory {
    link: Rc<ChannelLink>,
}

impl ChannelSocketFactory {
    pub fn new(mobility: StaticMobility, channel: SimChannel<MobilityId>) -> Self {
        Self {
            link: Rc::new(ChannelLink {
                mobility,
                channel,
                log: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn channel(&self) -> &SimChannel<MobilityId> {
        &self.link.channel
    }

    /// Every transmission so far, in send order
    pub fn transmissions(&self) -> Vec<Transmission> {
        self.link.log.borrow().clone()
    }
}

impl SocketFactory for ChannelSocketFactory {
    fn connect(
        &mut self,
        local: NodeId,
        remote: NodeId,
    ) -> Result<Box<dyn PacketSocket>, TransportError> {
        let resolve = |node: NodeId| {
            self.link
                .mobility
                .resolve(node)
                .ok_or_else(|| TransportError::BindFailed(format!("node {} is not placed", node)))
        };
        let from = resolve(local)?;
        let to = resolve(remote)?;

        Ok(Box::new(ChannelSocket {
            local,
            remote,
            from,
            to,
            open: true,
            link: Rc::clone(&self.link),
        }))
    }
}

#[derive(Debug)]
struct ChannelSocket {
    local: NodeId,
    remote: NodeId,
    from: MobilityId,
    to: MobilityId,
    open: bool,
    link: Rc<ChannelLink>,
}

impl PacketSocket for ChannelSocket {
    fn send(&mut self, payload: Bytes) -> Result<usize, TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        let loss_db = self.link.channel.loss_between(&self.from, &self.to);
        let received = loss_db.is_finite();
        self.link.log.borrow_mut().push(Transmission {
            from: self.local,
            to: self.remote,
            size: payload.len(),
            loss_db,
            received,
        });
        Ok(payload.len())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn local(&self) -> NodeId {
        self.local
    }

    fn remote(&self) -> NodeId {
        self.remote
    }
}

/// Per-flow results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStats {
    pub flow: Flow,
    pub traffic: TrafficStats,
    pub packets_received: u64,
    pub bytes_received: u64,
}

/// Results of one run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimStats {
    /// Simulated time at the end of the run, in seconds
    pub end_time: f64,
    pub events_dispatched: u64,
    pub nodes: usize,
    pub edges: usize,
    pub flows: Vec<FlowStats>,
}

impl SimStats {
    pub fn packets_sent(&self) -> u64 {
        self.flows.iter().map(|f| f.traffic.packets_sent).sum()
    }

    pub fn bytes_sent(&self) -> u64 {
        self.flows.iter().map(|f| f.traffic.bytes_sent).sum()
    }

    pub fn packets_received(&self) -> u64 {
        self.flows.iter().map(|f| f.packets_received).sum()
    }

    pub fn send_failures(&self) -> u64 {
        self.flows.iter().map(|f| f.traffic.send_failures).sum()
    }

    /// Fraction of sent packets that were received (1.0 if nothing was sent)
    pub fn delivery_ratio(&self) -> f64 {
        let sent = self.packets_sent();
        if sent == 0 {
            1.0
        } else {
            self.packets_received() as f64 / sent as f64
        }
    }

    /// Short human-readable summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "t={:.3}s events={} nodes={} edges={} flows={}\n",
            self.end_time,
            self.events_dispatched,
            self.nodes,
            self.edges,
            self.flows.len()
        );
        for stats in &self.flows {
            out.push_str(&format!(
                "  {}: sent={} ({} B) received={} failures={} mode switches={}\n",
                stats.flow,
                stats.traffic.packets_sent,
                stats.traffic.bytes_sent,
                stats.packets_received,
                stats.traffic.send_failures,
                stats.traffic.mode_switches,
            ));
        }
        out.push_str(&format!("  delivery ratio: {:.1}%", self.delivery_ratio() * 100.0));
        out
    }
}

/// A configured run
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    graph: Graph,
    sockets: ChannelSocketFactory,
    scheduler: Scheduler<usize>,
    generators: Vec<MarkovTrafficGenerator>,
}

impl Simulation {
    /// Build the topology selected by `config` and set up a run over it
    ///
    /// # Errors
    ///
    /// Fails on invalid config, a missing or malformed topology file, or a
    /// loss model that provides no graph.
    pub fn new(config: SimConfig) -> CsmarlResult<Self> {
        config.validate()?;
        let graph = build_graph(&config.topology)?.ok_or_else(|| CsmarlError::NoGraph {
            loss_model: config.topology.loss_model.to_string(),
        })?;
        Self::with_graph(config, graph)
    }

    /// Set up a run over an already built graph
    pub fn with_graph(config: SimConfig, graph: Graph) -> CsmarlResult<Self> {
        config.validate()?;

        let mobility = StaticMobility::from_graph(&graph);
        let mut channel = SimChannel::new();
        configure_matrix_topology(&mut channel, &graph, &mobility)?;

        let generators = graph
            .flows()
            .iter()
            .enumerate()
            .map(|(index, flow)| {
                if flow.is_self_pair() {
                    warn!(%flow, "flow sends to itself");
                }
                MarkovTrafficGenerator::new(&config.traffic, *flow, index as u32, config.seed)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            generators = generators.len(),
            sim_time = config.sim_time,
            "simulation ready"
        );

        Ok(Self {
            config,
            graph,
            sockets: ChannelSocketFactory::new(mobility, channel),
            scheduler: Scheduler::new(),
            generators,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn channel(&self) -> &SimChannel<MobilityId> {
        self.sockets.channel()
    }

    pub fn generators(&self) -> &[MarkovTrafficGenerator] {
        &self.generators
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Every transmission so far, in send order
    pub fn transmissions(&self) -> Vec<Transmission> {
        self.sockets.transmissions()
    }

    /// Start every generator, run for the configured duration, then stop
    /// them all
    ///
    /// Events at exactly the end time still fire. A generator error aborts
    /// the run; generators started before it are stopped again.
    pub fn run(&mut self) -> CsmarlResult<SimStats> {
        let end = self.scheduler.now() + self.config.sim_duration().as_duration();

        let result = self.start_all().and_then(|()| self.dispatch_until(end));

        for (index, generator) in self.generators.iter_mut().enumerate() {
            generator.stop(&mut self.scheduler.timer_for(index));
        }
        result?;

        self.scheduler.advance_to(end);
        let stats = self.stats();
        info!(
            end_time = stats.end_time,
            packets = stats.packets_sent(),
            received = stats.packets_received(),
            "simulation finished"
        );
        Ok(stats)
    }

    fn start_all(&mut self) -> CsmarlResult<()> {
        for (index, generator) in self.generators.iter_mut().enumerate() {
            generator.start(&mut self.scheduler.timer_for(index), &mut self.sockets)?;
        }
        Ok(())
    }

    fn dispatch_until(&mut self, end: SimTime) -> CsmarlResult<()> {
        while self.scheduler.peek_time().is_some_and(|time| time <= end) {
            let Some((id, index)) = self.scheduler.pop() else {
                break;
            };
            debug!(%id, flow = index, time = %self.scheduler.now(), "firing generator");
            self.generators[index].fire(&mut self.scheduler.timer_for(index))?;
        }
        Ok(())
    }

    /// Statistics of everything that happened so far
    pub fn stats(&self) -> SimStats {
        let transmissions = self.sockets.transmissions();
        let flows = self
            .generators
            .iter()
            .map(|generator| {
                let flow = generator.flow();
                let received = transmissions
                    .iter()
                    .filter(|t| t.received && t.from == flow.sender && t.to == flow.receiver);
                let (packets_received, bytes_received) =
                    received.fold((0, 0), |(n, b), t| (n + 1, b + t.size as u64));
                FlowStats {
                    flow,
                    traffic: generator.stats(),
                    packets_received,
                    bytes_received,
                }
            })
            .collect();

        SimStats {
            end_time: self.scheduler.now().as_secs_f64(),
            events_dispatched: self.scheduler.dispatched(),
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            flows,
        }
    }
}

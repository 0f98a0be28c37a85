//! csmarl-sim - interference topologies and Markov traffic
//!
//! Builds interference graphs from topology files or random placement and
//! runs Markov-modulated traffic over them.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use csmarl_logging::{LogConfig, SubscriberBuilder};
use tracing::info;

use csmarl_simulation::{
    Layout, LossModel, SimConfig, SimTime, Simulation, build_graph, geometric_graph, save_topology,
    scenarios, topology_path,
};

#[derive(Parser)]
#[command(
    name = "csmarl-sim",
    about = "Interference topologies and Markov-modulated traffic",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a topology and print it
    Build {
        #[command(flatten)]
        topology: TopologyArgs,
    },

    /// Run a full simulation and print statistics
    Run {
        #[command(flatten)]
        topology: TopologyArgs,

        /// Simulated time in seconds
        #[arg(short = 't', long)]
        sim_time: Option<f64>,

        /// Seed of the traffic streams
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Write JSONL trace logs to this directory instead of the console
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// Write a random geometric topology file
    Generate {
        /// Layout of the written file
        #[arg(short, long, default_value = "node")]
        layout: Layout,

        /// Number of flows
        #[arg(short, long, default_value = "4")]
        flow_count: u32,

        /// Placement seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Output file (defaults to <graphs-dir>/<layout>/<name>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name used when no output path is given
        #[arg(short, long, default_value = "generated")]
        name: String,

        /// Root directory of topology files
        #[arg(long, default_value = "graphs")]
        graphs_dir: PathBuf,
    },

    /// Run a built-in demo scenario
    Scenario {
        #[arg(value_enum)]
        which: ScenarioKind,

        /// Directory for scenario topology files
        #[arg(long, default_value = "graphs")]
        graphs_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioKind {
    /// Two interfering links read from a file
    LinkFile,
    /// Three randomly placed flows
    Geometric,
    /// One generator switching modes
    ModeSwitch,
}

/// Topology overrides shared by `build` and `run`
#[derive(Args)]
struct TopologyArgs {
    /// File layout: node or link
    #[arg(short, long)]
    layout: Option<Layout>,

    /// Loss model: graph, geometric, or any other name (no graph)
    #[arg(short = 'm', long)]
    loss_model: Option<LossModel>,

    /// Topology file name under <graphs-dir>/<layout>/
    #[arg(short = 'n', long)]
    topology: Option<String>,

    /// Root directory of topology files
    #[arg(long)]
    graphs_dir: Option<PathBuf>,

    /// Number of flows for the geometric builder
    #[arg(long)]
    flow_count: Option<u32>,

    /// Seed for the geometric builder
    #[arg(long)]
    graph_seed: Option<u64>,
}

impl TopologyArgs {
    fn apply(self, config: &mut SimConfig) {
        let topology = &mut config.topology;
        if let Some(layout) = self.layout {
            topology.layout = layout;
        }
        if let Some(loss_model) = self.loss_model {
            topology.loss_model = loss_model;
        }
        if let Some(name) = self.topology {
            topology.name = name;
        }
        if let Some(dir) = self.graphs_dir {
            topology.graphs_dir = dir;
        }
        if let Some(count) = self.flow_count {
            topology.flow_count = count;
        }
        if let Some(seed) = self.graph_seed {
            topology.graph_seed = seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };

    let mut logging = match &cli.command {
        Commands::Run {
            log_dir: Some(dir), ..
        } => LogConfig::batch(dir.clone()),
        _ => config.logging.clone(),
    };
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    let _guard = SubscriberBuilder::new().with_config(logging).try_init()?;

    match cli.command {
        Commands::Build { topology } => {
            topology.apply(&mut config);
            match build_graph(&config.topology)? {
                Some(graph) => println!("{}", graph.visualize()),
                None => println!(
                    "Loss model {} provides no topology graph",
                    config.topology.loss_model
                ),
            }
        }
        Commands::Run {
            topology,
            sim_time,
            seed,
            json,
            ..
        } => {
            topology.apply(&mut config);
            if let Some(sim_time) = sim_time {
                config.sim_time = sim_time;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }

            let mut sim = Simulation::new(config)?;
            let stats = sim.run()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats.summary());
            }
        }
        Commands::Generate {
            layout,
            flow_count,
            seed,
            output,
            name,
            graphs_dir,
        } => {
            let graph = geometric_graph(layout, flow_count, seed);
            let path = output.unwrap_or_else(|| topology_path(&graphs_dir, layout, &name));
            save_topology(&graph, layout, &path)?;
            info!(path = %path.display(), flows = flow_count, "geometric topology written");
            println!("{}", graph.visualize());
        }
        Commands::Scenario { which, graphs_dir } => match which {
            ScenarioKind::LinkFile => {
                scenarios::run_link_file_scenario(&graphs_dir)?;
            }
            ScenarioKind::Geometric => {
                scenarios::run_geometric_scenario(config.topology.graph_seed)?;
            }
            ScenarioKind::ModeSwitch => {
                scenarios::run_mode_switch_scenario(SimTime::from_secs(20))?;
            }
        },
    }

    Ok(())
}

//! Run configuration
//!
//! A run is described by one TOML file:
//!
//! ```toml
//! sim_time = 30.0
//! seed = 7
//!
//! [topology]
//! layout = "link"
//! loss_model = "graph"
//! name = "fim"
//! graphs_dir = "graphs"
//!
//! [traffic]
//! mode1_delay = "exponential:0.05"
//! mode2_delay = "exponential:0.5"
//! modulation_interval = "uniform:1,5"
//! packet_size = "uniform:20,1500"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every table and field is optional.

use std::fs;
use std::path::Path;

use csmarl_core::{ConfigError, SimTime};
use csmarl_logging::LogConfig;
use serde::{Deserialize, Serialize};

use crate::topology::TopologyConfig;
use crate::traffic::MarkovTrafficConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulated duration in seconds
    pub sim_time: f64,
    /// Seed of the traffic streams
    pub seed: u64,
    pub topology: TopologyConfig,
    pub traffic: MarkovTrafficConfig,
    pub logging: LogConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sim_time: 10.0,
            seed: 1,
            topology: TopologyConfig::default(),
            traffic: MarkovTrafficConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load and validate a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if SimTime::try_from_secs_f64(self.sim_time).is_none() {
            return Err(ConfigError::InvalidSimTime(self.sim_time));
        }
        self.traffic.validate()
    }

    /// Simulated duration as a point on the clock
    pub fn sim_duration(&self) -> SimTime {
        SimTime::from_secs_f64(self.sim_time)
    }

    /// Render the config back to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

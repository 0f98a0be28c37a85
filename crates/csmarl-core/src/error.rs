//! Error types for csmarl

use std::path::PathBuf;

use thiserror::Error;

use crate::identity::NodeId;

/// Top-level error type for csmarl
#[derive(Debug, Error)]
pub enum CsmarlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Interference binding error: {0}")]
    Bind(#[from] BindError),

    #[error("Traffic error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Loss model {loss_model} provides no topology graph")]
    NoGraph { loss_model: String },
}

/// Errors in run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown layout: {0} (expected \"node\" or \"link\")")]
    UnknownLayout(String),

    #[error("Invalid random variable spec: {0}")]
    InvalidRandomVariable(String),

    #[error("Invalid traffic parameter {name}: {reason}")]
    InvalidTraffic { name: &'static str, reason: String },

    #[error("Invalid simulation time: {0} s")]
    InvalidSimTime(f64),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Errors while reading or writing topology files
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("File {path} not found or unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: token {position}: expected {expected}, found {found:?}")]
    Parse {
        path: PathBuf,
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("{path}: unexpected end of file, expected {expected}")]
    UnexpectedEof { path: PathBuf, expected: &'static str },

    #[error("{path}: id {id} out of range (limit {limit})")]
    NodeOutOfRange { path: PathBuf, id: u32, limit: u32 },
}

impl TopologyError {
    /// True for the missing/unreadable file case
    pub fn is_resource_error(&self) -> bool {
        matches!(self, TopologyError::Io { .. })
    }
}

/// Errors while installing interference edges into a channel
#[derive(Debug, Error)]
pub enum BindError {
    #[error("No mobility handle for node {0}")]
    UnresolvedNode(NodeId),
}

/// Errors raised by a traffic generator
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("Packet size rejection sampling gave up after {attempts} draws below {minimum} bytes")]
    SizeRejectionExhausted { attempts: u32, minimum: u32 },

    #[error("Sampled a negative {what}: {value}")]
    NegativeDelay { what: &'static str, value: f64 },

    #[error("Sampled {what} of {value} s does not fit the simulated clock")]
    DelayOutOfRange { what: &'static str, value: f64 },

    #[error("Generator is not running")]
    NotRunning,

    #[error("Generator is already running")]
    AlreadyRunning,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors related to transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Bind failed: {0}")]
    BindFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Socket closed")]
    Closed,
}

/// Result type alias for csmarl operations
pub type CsmarlResult<T> = Result<T, CsmarlError>;

use crate::network::NodeIndex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ant #{ant:02} stalled at node {node:?} on trip {trip}: no arc can carry {load}")]
    Stall { ant: usize, node: NodeIndex, trip: usize, load: f64 },
    #[error("ant #{ant:02} exceeded {steps} steps on trip {trip}")]
    StepLimit { ant: usize, trip: usize, steps: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
    #[error("no ant completed a feasible tour")]
    NoSolution,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Failures of a single ant's tour, as opposed to failures of the run.
    pub fn is_ant_failure(&self) -> bool {
        matches!(self, Error::Stall { .. } | Error::StepLimit { .. })
    }
}

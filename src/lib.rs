pub mod algorithm;
pub mod component;
pub mod network;
pub mod utils;

use algorithm::Colony;
use component::Solution;
use network::FlowNetwork;
use utils::config::Config;
use utils::error::Error;

/// Runs a whole colony search with `config` and returns the best solution.
pub fn solve(network: &FlowNetwork, config: Config) -> Result<Solution, Error> {
    Colony::new(network, config)?.solve()
}

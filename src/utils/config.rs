use serde::{Deserialize, Serialize};
use argh::FromArgs;
use super::error::Error;

/// Relative slack under which a leftover quantity joins the last trip.
pub const RESIDUE: f64 = 1e-9;

/// Load of the next trip: a full backpack, or the rest when at most that
/// much is left.
pub fn trip_load(backpack: f64, remaining: f64) -> f64 {
    if remaining <= backpack * (1.0 + RESIDUE) {
        remaining
    } else {
        backpack
    }
}

/// An ant colony search for fixed-charge network flow
#[derive(FromArgs)]
pub struct Arguments {
    /// path to network file
    #[argh(positional)]
    pub network: String,
    /// path to configuration file
    #[argh(option, short='c', default="String::from(\"data/config/default.yaml\")")]
    pub config: String,
    /// override the flow quantity every ant must assign
    #[argh(option, short='t')]
    pub target: Option<f64>,
    /// override population size
    #[argh(option, short='n')]
    pub ants: Option<usize>,
    /// override number of episodes
    #[argh(option, short='e')]
    pub episodes: Option<usize>,
    /// override evaporation rate, clamped into [0, 1]
    #[argh(option, short='r')]
    pub evaporation: Option<f64>,
    /// override random seed
    #[argh(option, short='s')]
    pub seed: Option<u64>,
    /// write the best solution to this json file
    #[argh(option, short='o')]
    pub output: Option<String>,
    /// log every episode
    #[argh(switch, short='v')]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuardKind {
    Backtrack,
    History,
}

#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StallPolicy {
    Abort,
    Discard,
}

impl Default for GuardKind {
    fn default() -> Self {
        GuardKind::Backtrack
    }
}

impl Default for StallPolicy {
    fn default() -> Self {
        StallPolicy::Abort
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    pub name: String,
    pub seed: u64,
    pub target_flow: f64,
    pub backpack: f64,
    pub ants: usize,
    pub episodes: usize,
    #[serde(default)]
    pub guard: GuardKind,
    #[serde(default)]
    pub on_stall: StallPolicy,
    #[serde(default)]
    pub max_steps: Option<usize>,
    pub parameters: Parameters,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Parameters {
    pub alpha: f64,
    pub beta: f64,
    pub evaporation: f64,
    pub q: f64,
    #[serde(default = "Parameters::default_pheromone")]
    pub initial_pheromone: f64,
}

impl Parameters {
    fn default_pheromone() -> f64 {
        1.0
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            alpha: 1.0,
            beta: 1.0,
            evaporation: 0.5,
            q: 5.0,
            initial_pheromone: Parameters::default_pheromone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: String::from("default"),
            seed: 420,
            target_flow: 100.0,
            backpack: 10.0,
            ants: 10,
            episodes: 15,
            guard: GuardKind::default(),
            on_stall: StallPolicy::default(),
            max_steps: None,
            parameters: Parameters::default(),
        }
    }
}

impl Config {
    pub fn override_from_args(&mut self, args: &Arguments) {
        if let Some(target) = args.target {
            self.target_flow = target;
        }
        if let Some(ants) = args.ants {
            self.ants = ants;
        }
        if let Some(episodes) = args.episodes {
            self.episodes = episodes;
        }
        if let Some(evaporation) = args.evaporation {
            self.parameters.evaporation = num::clamp(evaporation, 0.0, 1.0);
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
    }
    /// Rejects values the search cannot run with, before any ant moves.
    pub fn validate(&self) -> Result<(), Error> {
        let params = &self.parameters;
        let checks = [
            (self.ants > 0, "ants must be positive"),
            (self.episodes > 0, "episodes must be positive"),
            (self.target_flow > 0.0, "target_flow must be positive"),
            (self.backpack > 0.0, "backpack must be positive"),
            (self.max_steps != Some(0), "max_steps must be positive when given"),
            ((0.0..=1.0).contains(&params.evaporation), "evaporation must lie in [0, 1]"),
            (params.alpha >= 0.0, "alpha must be non-negative"),
            (params.beta >= 0.0, "beta must be non-negative"),
            (params.q > 0.0, "q must be positive"),
            (params.initial_pheromone >= 0.0, "initial_pheromone must be non-negative"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(Error::InvalidConfig(reason.to_string())),
            None => Ok(()),
        }
    }
    /// Whether the final trip of every tour carries less than a full backpack.
    pub fn has_partial_trip(&self) -> bool {
        let slack = self.backpack * RESIDUE;
        let rem = self.target_flow % self.backpack;
        rem > slack && self.backpack - rem > slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn it_rejects_bad_values() {
        let mut config = Config::default();
        config.ants = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.episodes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parameters.evaporation = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parameters.evaporation = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parameters.beta = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parameters.q = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backpack = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn it_detects_partial_trips() {
        let mut config = Config::default();
        config.target_flow = 100.0;
        config.backpack = 25.0;
        assert!(!config.has_partial_trip());
        config.backpack = 30.0;
        assert!(config.has_partial_trip());
    }

    #[test]
    fn it_agrees_with_trip_load_on_residue() {
        let mut config = Config::default();
        config.backpack = 25.0;
        config.target_flow = 50.0 + 1e-11;
        // the residue rides along with the last full trip
        assert!(!config.has_partial_trip());
        assert_eq!(trip_load(25.0, 25.0 + 1e-11), 25.0 + 1e-11);

        config.target_flow = 60.0;
        assert!(config.has_partial_trip());
        assert_eq!(trip_load(25.0, 10.0), 10.0);
        assert_eq!(trip_load(25.0, 35.0), 25.0);
    }

    #[test]
    fn it_overrides_from_args() {
        let mut config = Config::default();
        let args = Arguments {
            network: String::from("net.yaml"),
            config: String::from("cfg.yaml"),
            target: Some(40.0),
            ants: None,
            episodes: Some(3),
            evaporation: Some(7.0),
            seed: Some(1),
            output: None,
            verbose: false,
        };
        config.override_from_args(&args);
        assert_eq!(config.target_flow, 40.0);
        assert_eq!(config.ants, 10);
        assert_eq!(config.episodes, 3);
        assert_eq!(config.parameters.evaporation, 1.0);
        assert_eq!(config.seed, 1);
    }
}

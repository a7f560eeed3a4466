use ordered_float::OrderedFloat;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};
use crate::component::Solution;
use crate::network::FlowNetwork;
use crate::utils::config::{Config, StallPolicy};
use crate::utils::error::Error;
use super::ant::Ant;
use super::base::trail::Trail;


/// Drives a fixed population of ants over a fixed number of episodes and
/// keeps the cheapest tour any of them has found.
pub struct Colony<'a> {
    network: &'a FlowNetwork,
    config: Config,
    trail: Trail,
    ants: Vec<Ant>,
    best: Option<Solution>,
    convergence: Vec<Option<f64>>,
}

impl<'a> Colony<'a> {
    pub fn new(network: &'a FlowNetwork, config: Config) -> Result<Self, Error> {
        config.validate()?;
        if config.has_partial_trip() {
            warn!(target_flow = config.target_flow, backpack = config.backpack,
                  "target flow is not a multiple of the backpack, final trips carry the remainder");
        }
        let trail = Trail::new(network, &config.parameters);
        let ants = (0..config.ants)
            .map(|id| Ant::new(id, network, &config))
            .collect();
        Ok(Colony { network, config, trail, ants, best: None, convergence: vec![] })
    }
    pub fn solve(&mut self) -> Result<Solution, Error> {
        for episode in 0..self.config.episodes {
            self.run_episode(episode)?;
        }
        let best = self.best.clone().ok_or(Error::NoSolution)?;
        info!(name = %self.config.name, cost = best.total_cost(),
              episodes = self.config.episodes, "search finished");
        Ok(best)
    }
    /// Lets every ant tour against the current trail, then updates the
    /// global best and the trail once all of them are done.
    pub fn run_episode(&mut self, episode: usize) -> Result<(), Error> {
        let mut tours = Vec::with_capacity(self.ants.len());
        for (id, outcome) in self.construct_tours().into_iter().enumerate() {
            match outcome {
                Ok(solution) => tours.push(solution),
                Err(err) if err.is_ant_failure() && self.config.on_stall == StallPolicy::Discard => {
                    warn!(episode, ant = id, "discarding ant: {}", err);
                }
                Err(err) => {
                    self.reset_ants();
                    return Err(err);
                }
            }
        }

        let local_best = tours.into_iter()
            .min_by_key(|solution| OrderedFloat(solution.total_cost()));
        if let Some(local_best) = local_best {
            self.update_best(episode, local_best);
        }

        self.trail.evaporate();
        if let Some(best) = &self.best {
            self.trail.reinforce(best);
        }
        self.convergence.push(self.best_cost());

        self.reset_ants();
        debug!(episode, best = ?self.best_cost(), "episode finished");
        Ok(())
    }
    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(Solution::total_cost)
    }
    /// Best known cost after each finished episode.
    pub fn convergence(&self) -> &[Option<f64>] {
        &self.convergence
    }
    pub fn trail(&self) -> &Trail {
        &self.trail
    }
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(feature = "parallel")]
    fn construct_tours(&mut self) -> Vec<Result<Solution, Error>> {
        let (network, trail) = (self.network, &self.trail);
        self.ants.par_iter_mut()
            .map(|ant| ant.find_solution(network, trail))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    fn construct_tours(&mut self) -> Vec<Result<Solution, Error>> {
        let (network, trail) = (self.network, &self.trail);
        self.ants.iter_mut()
            .map(|ant| ant.find_solution(network, trail))
            .collect()
    }
    fn reset_ants(&mut self) {
        let network = self.network;
        for ant in self.ants.iter_mut() {
            ant.reset(network);
        }
    }
    /// Ties keep the earlier solution.
    fn update_best(&mut self, episode: usize, candidate: Solution) {
        let improved = self.best.as_ref()
            .map_or(true, |best| candidate.total_cost() < best.total_cost());
        if improved {
            info!(episode, cost = candidate.total_cost(), "new best solution");
            self.best = Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ArcKey, ArcKind};

    /// Two routes from source 0 to sink 3: cheap through 1, dear through 2.
    fn two_routes() -> FlowNetwork {
        let mut network = FlowNetwork::new(4, vec![100.0]);
        network.add_source(0, 100.0, 1.0).unwrap();
        network.add_sink(3, 100.0, 1.0).unwrap();
        network.add_edge((0, 1), &[5.0], &[1.0]).unwrap();
        network.add_edge((1, 3), &[5.0], &[1.0]).unwrap();
        network.add_edge((0, 2), &[50.0], &[4.0]).unwrap();
        network.add_edge((2, 3), &[50.0], &[4.0]).unwrap();
        network
    }

    fn config() -> Config {
        Config {
            target_flow: 100.0,
            backpack: 50.0,
            ants: 8,
            episodes: 10,
            ..Config::default()
        }
    }

    #[test]
    fn it_rejects_invalid_config() {
        let network = two_routes();
        let mut cfg = config();
        cfg.ants = 0;
        assert!(matches!(Colony::new(&network, cfg), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn it_never_worsens_best_cost() {
        let network = two_routes();
        let mut colony = Colony::new(&network, config()).unwrap();
        let best = colony.solve().unwrap();
        let costs: Vec<f64> = colony.convergence().iter()
            .map(|cost| cost.unwrap())
            .collect();
        assert_eq!(costs.len(), 10);
        assert!(costs.windows(2).all(|pair| pair[1] <= pair[0]));
        assert_eq!(*costs.last().unwrap(), best.total_cost());
        assert_eq!(best.delivered(), 100.0);
    }

    #[test]
    fn it_finds_the_cheap_route() {
        let network = two_routes();
        let mut cfg = config();
        cfg.episodes = 20;
        let mut colony = Colony::new(&network, cfg).unwrap();
        let best = colony.solve().unwrap();
        // 100 source + 100 sink + 2 * (5 + 100) along 0 -> 1 -> 3
        assert_eq!(best.total_cost(), 410.0);
        let cheap = network.arc_index(&ArcKey::new(0.into(), 1.into(), 0)).unwrap();
        assert!(best.is_open(cheap));
    }

    #[test]
    fn it_reinforces_global_best() {
        let network = two_routes();
        let mut cfg = config();
        cfg.parameters.evaporation = 0.5;
        cfg.parameters.initial_pheromone = 1.0;
        let mut colony = Colony::new(&network, cfg).unwrap();
        colony.run_episode(0).unwrap();
        let best = colony.best().unwrap().clone();
        let deposit = 5.0 / best.total_cost();
        for arc in network.arcs() {
            let expected = if best.is_open(arc) { deposit } else { 0.5 };
            assert!((colony.trail().pheromone(arc) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn it_resets_ants_between_episodes() {
        let network = two_routes();
        let mut colony = Colony::new(&network, config()).unwrap();
        colony.run_episode(0).unwrap();
        for ant in colony.ants() {
            assert_eq!(ant.trips(), 0);
            assert_eq!(ant.delivered(), 0.0);
            assert!(network.arcs().all(|arc| ant.assigned(arc) == 0.0));
            assert!(network.arcs().all(|arc| ant.available(arc) == network.link(arc).capacity));
        }
    }

    #[test]
    fn it_replays_runs_with_same_seed() {
        let network = two_routes();
        let run = || {
            let mut colony = Colony::new(&network, config()).unwrap();
            colony.solve().unwrap();
            colony.convergence().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn it_keeps_earlier_best_on_tie() {
        let network = two_routes();
        let mut colony = Colony::new(&network, config()).unwrap();
        let flows = |route: usize| -> Vec<f64> {
            network.arcs()
                .map(|arc| match network.link(arc).kind {
                    ArcKind::Edge { edge, .. } if edge / 2 == route => 100.0,
                    ArcKind::Supply(_) | ArcKind::Demand(_) => 100.0,
                    _ => 0.0,
                })
                .collect()
        };
        let first = Solution::new(&network, 100.0, flows(1), "first");
        let second = Solution::new(&network, 100.0, flows(1), "second");
        assert_eq!(first.total_cost(), second.total_cost());
        colony.update_best(0, first);
        colony.update_best(1, second);
        assert_eq!(colony.best().unwrap().provenance(), "first");

        let cheaper = Solution::new(&network, 100.0, flows(0), "cheaper");
        colony.update_best(2, cheaper);
        assert_eq!(colony.best().unwrap().provenance(), "cheaper");
        assert_eq!(colony.best_cost(), Some(410.0));
    }

    #[test]
    fn it_resets_ants_after_abort() {
        // 0 -> 1 is a dead end, 0 -> 2 reaches the sink
        let mut network = FlowNetwork::new(3, vec![50.0]);
        network.add_source(0, 1000.0, 1.0).unwrap();
        network.add_sink(2, 1000.0, 1.0).unwrap();
        network.add_edge((0, 1), &[1.0], &[1.0]).unwrap();
        network.add_edge((0, 2), &[10.0], &[2.0]).unwrap();
        let mut cfg = config();
        cfg.target_flow = 50.0;
        cfg.ants = 4;
        let mut colony = Colony::new(&network, cfg).unwrap();

        let mut aborted = false;
        for episode in 0..10 {
            if let Err(err) = colony.run_episode(episode) {
                assert!(matches!(err, Error::Stall { .. }));
                aborted = true;
            }
            for ant in colony.ants() {
                assert_eq!(ant.trips(), 0);
                assert!(network.arcs().all(|arc| ant.assigned(arc) == 0.0));
            }
        }
        assert!(aborted);

        // a later episode starts clean, so every kept tour balances
        if let Some(best) = colony.best() {
            assert_eq!(best.source_flows(), best.sink_flows());
            assert_eq!(best.total_cost(), 210.0);
        }
    }

    #[test]
    fn it_applies_stall_policy() {
        let mut network = FlowNetwork::new(2, vec![50.0]);
        network.add_source(0, 50.0, 1.0).unwrap();
        network.add_sink(1, 50.0, 1.0).unwrap();
        network.add_edge((0, 1), &[10.0], &[2.0]).unwrap();

        let mut colony = Colony::new(&network, config()).unwrap();
        assert!(matches!(colony.solve(), Err(Error::Stall { .. })));

        let mut cfg = config();
        cfg.on_stall = StallPolicy::Discard;
        let mut colony = Colony::new(&network, cfg).unwrap();
        assert!(matches!(colony.solve(), Err(Error::NoSolution)));
        assert!(colony.convergence().iter().all(Option::is_none));
    }
}

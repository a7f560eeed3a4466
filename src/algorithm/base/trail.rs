use crate::component::Solution;
use crate::network::{ArcIndex, ArcKind, FlowNetwork};
use crate::utils::config::Parameters;

/// Costs below this are treated as this when inverted into goodness.
const MIN_COST: f64 = 1e-3;

/// Shared memory of the colony. Ants only read it; the colony writes it
/// between episodes.
#[derive(Clone, Debug)]
pub struct Trail {
    pheromone: Vec<f64>,
    goodness: Vec<f64>,
    alpha: f64,
    beta: f64,
    rho: f64,
    q: f64,
}

impl Trail {
    pub fn new(network: &FlowNetwork, params: &Parameters) -> Self {
        let pheromone = vec![params.initial_pheromone; network.arc_count()];
        let goodness = network.arcs()
            .map(|arc| goodness_of(network, arc))
            .collect();
        Trail {
            pheromone,
            goodness,
            alpha: params.alpha,
            beta: params.beta,
            rho: params.evaporation,
            q: params.q,
        }
    }
    pub fn pheromone(&self, arc: ArcIndex) -> f64 {
        self.pheromone[arc.index()]
    }
    pub fn goodness(&self, arc: ArcIndex) -> f64 {
        self.goodness[arc.index()]
    }
    /// Attractiveness of `arc`: pheromone^alpha * goodness^beta.
    pub fn score(&self, arc: ArcIndex) -> f64 {
        self.pheromone(arc).powf(self.alpha) * self.goodness(arc).powf(self.beta)
    }
    pub fn evaporate(&mut self) {
        debug_assert!((0.0..=1.0).contains(&self.rho));
        let keep = 1.0 - self.rho;
        for pheromone in self.pheromone.iter_mut() {
            *pheromone *= keep;
        }
    }
    /// Sets, rather than adds, Q / cost on every arc the solution uses.
    pub fn reinforce(&mut self, best: &Solution) {
        let deposit = self.q / best.total_cost().max(MIN_COST);
        for arc in best.open_arcs() {
            self.pheromone[arc.index()] = deposit;
        }
    }
}

fn goodness_of(network: &FlowNetwork, arc: ArcIndex) -> f64 {
    let link = network.link(arc);
    let cost = match link.kind {
        ArcKind::Edge { .. } => link.fixed_cost + link.variable_cost,
        _ => link.variable_cost,
    };
    1.0 / cost.max(MIN_COST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ArcKey;

    fn setup() -> FlowNetwork {
        let mut network = FlowNetwork::new(2, vec![50.0]);
        network.add_source(0, 50.0, 1.0).unwrap();
        network.add_sink(1, 50.0, 4.0).unwrap();
        network.add_edge((0, 1), &[10.0], &[2.0]).unwrap();
        network.add_edge((1, 0), &[0.0], &[0.0]).unwrap();
        network
    }

    fn params(evaporation: f64) -> Parameters {
        Parameters { evaporation, initial_pheromone: 2.0, ..Parameters::default() }
    }

    #[test]
    fn it_derives_goodness_from_costs() {
        let network = setup();
        let trail = Trail::new(&network, &params(0.5));
        let edge = network.arc_index(&ArcKey::new(0.into(), 1.into(), 0)).unwrap();
        let demand = network.arc_index(&ArcKey::new(1.into(), network.super_sink(), 0)).unwrap();
        let free = network.arc_index(&ArcKey::new(1.into(), 0.into(), 0)).unwrap();
        assert!((trail.goodness(edge) - 1.0 / 12.0).abs() < 1e-12);
        assert!((trail.goodness(demand) - 0.25).abs() < 1e-12);
        assert!(trail.goodness(free).is_finite());
    }

    #[test]
    fn it_evaporates_strictly() {
        let network = setup();
        let mut trail = Trail::new(&network, &params(0.25));
        trail.evaporate();
        assert!(network.arcs().all(|arc| trail.pheromone(arc) == 1.5));
        assert!(network.arcs().all(|arc| trail.pheromone(arc) < 2.0));
    }

    #[test]
    fn it_keeps_pheromone_without_evaporation() {
        let network = setup();
        let mut trail = Trail::new(&network, &params(0.0));
        trail.evaporate();
        assert!(network.arcs().all(|arc| trail.pheromone(arc) == 2.0));
        let mut trail = Trail::new(&network, &params(1.0));
        trail.evaporate();
        assert!(network.arcs().all(|arc| trail.pheromone(arc) == 0.0));
    }

    #[test]
    fn it_reinforces_only_used_arcs() {
        let network = setup();
        let mut trail = Trail::new(&network, &params(0.5));
        let (ss, st) = (network.super_source(), network.super_sink());
        let used = [
            ArcKey::new(ss, 0.into(), 0),
            ArcKey::new(0.into(), 1.into(), 0),
            ArcKey::new(1.into(), st, 0),
        ];
        let mut flows = vec![0.0; network.arc_count()];
        for key in used.iter() {
            flows[network.arc_index(key).unwrap().index()] = 50.0;
        }
        let best = Solution::new(&network, 50.0, flows, "test");
        trail.reinforce(&best);
        // q = 5, cost = 50 + 200 + 10 + 100
        for key in used.iter() {
            let arc = network.arc_index(key).unwrap();
            assert!((trail.pheromone(arc) - 5.0 / 360.0).abs() < 1e-12);
        }
        let unused = network.arc_index(&ArcKey::new(1.into(), 0.into(), 0)).unwrap();
        assert_eq!(trail.pheromone(unused), 2.0);
    }
}

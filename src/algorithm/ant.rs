use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::trace;
use crate::component::Solution;
use crate::network::{ArcIndex, ArcKind, FlowNetwork, NodeIndex, Path};
use crate::utils::config::{self, Config};
use crate::utils::error::Error;
use super::base::roulette;
use super::base::trail::Trail;
use super::guard::{CycleGuard, GuardEnum};

pub const PROVENANCE: &str = "ACO";


/// One agent of the colony. It assigns `target_flow` units from the
/// super-source to the super-sink, one backpack per trip, against private
/// copies of the arc capacities.
#[derive(Clone, Debug)]
pub struct Ant {
    id: usize,
    target_flow: f64,
    backpack: f64,
    max_steps: Option<usize>,
    guard: GuardEnum,
    rng: ChaChaRng,
    // tour state
    position: NodeIndex,
    remaining: f64,
    delivered: f64,
    trips: usize,
    available: Vec<f64>,
    assigned: Vec<f64>,
    traveled: Vec<u32>,
    // trip state
    load: f64,
    stack: Path,
    visited_arcs: Vec<bool>,
    on_path: Vec<bool>,
}

impl Ant {
    /// The generator is seeded from `config.seed` on a stream of its own, so
    /// every ant draws an independent and reproducible sequence.
    pub fn new(id: usize, network: &FlowNetwork, config: &Config) -> Self {
        let mut rng = ChaChaRng::seed_from_u64(config.seed);
        rng.set_stream(id as u64);
        let mut ant = Ant {
            id,
            target_flow: config.target_flow,
            backpack: config.backpack,
            max_steps: config.max_steps,
            guard: config.guard.into(),
            rng,
            position: network.super_source(),
            remaining: 0.0,
            delivered: 0.0,
            trips: 0,
            available: vec![],
            assigned: vec![],
            traveled: vec![],
            load: 0.0,
            stack: vec![],
            visited_arcs: vec![],
            on_path: vec![],
        };
        ant.reset(network);
        ant
    }
    /// Restores fresh capacities and clears all flow for the next tour.
    pub fn reset(&mut self, network: &FlowNetwork) {
        let arc_count = network.arc_count();
        self.available.clear();
        self.available.extend(network.arcs().map(|arc| network.link(arc).capacity));
        self.assigned.clear();
        self.assigned.resize(arc_count, 0.0);
        self.traveled.clear();
        self.traveled.resize(arc_count, 0);
        self.visited_arcs.clear();
        self.visited_arcs.resize(arc_count, false);
        self.on_path.clear();
        self.on_path.resize(network.node_count() + 2, false);
        self.stack.clear();
        self.position = network.super_source();
        self.remaining = self.target_flow;
        self.delivered = 0.0;
        self.trips = 0;
        self.load = 0.0;
    }
    /// Completes one tour and prices it. The shared trail is only read.
    pub fn find_solution(&mut self, network: &FlowNetwork, trail: &Trail) -> Result<Solution, Error> {
        while self.remaining > 0.0 {
            self.run_trip(network, trail)?;
        }
        trace!(ant = self.id, trips = self.trips, "tour complete");
        Ok(Solution::new(network, self.target_flow, self.assigned.clone(), PROVENANCE))
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn position(&self) -> NodeIndex {
        self.position
    }
    pub fn trips(&self) -> usize {
        self.trips
    }
    pub fn delivered(&self) -> f64 {
        self.delivered
    }
    pub fn remaining(&self) -> f64 {
        self.remaining
    }
    pub fn available(&self, arc: ArcIndex) -> f64 {
        self.available[arc.index()]
    }
    pub fn assigned(&self, arc: ArcIndex) -> f64 {
        self.assigned[arc.index()]
    }
    pub fn times_traveled(&self, arc: ArcIndex) -> u32 {
        self.traveled[arc.index()]
    }
    pub fn visited(&self, arc: ArcIndex) -> bool {
        self.visited_arcs[arc.index()]
    }

    fn run_trip(&mut self, network: &FlowNetwork, trail: &Trail) -> Result<(), Error> {
        self.begin_trip(network);
        if let Err(err) = self.walk_to_sink(network, trail) {
            self.abandon_trip(network);
            return Err(err);
        }
        self.remaining -= self.load;
        self.delivered += self.load;
        self.trips += 1;
        trace!(ant = self.id, trip = self.trips, load = self.load, "trip delivered");
        Ok(())
    }
    fn walk_to_sink(&mut self, network: &FlowNetwork, trail: &Trail) -> Result<(), Error> {
        let mut steps = 0;
        while self.position != network.super_sink() {
            if let Some(limit) = self.max_steps {
                if steps >= limit {
                    return Err(Error::StepLimit { ant: self.id, trip: self.trips, steps });
                }
            }
            let candidates = self.candidates(network);
            let arc = self.decide_arc_to_traverse(&candidates, trail)
                .ok_or(Error::Stall {
                    ant: self.id,
                    node: self.position,
                    trip: self.trips,
                    load: self.load,
                })?;
            self.traverse(network, arc);
            steps += 1;
        }
        Ok(())
    }
    /// Takes back the flow of an unfinished trip, leaving only completed
    /// trips on the arcs.
    fn abandon_trip(&mut self, network: &FlowNetwork) {
        let load = self.load;
        while let Some(arc) = self.stack.pop() {
            let i = arc.index();
            self.assigned[i] -= load;
            self.available[i] += load;
            self.traveled[i] -= 1;
        }
        self.on_path.iter_mut().for_each(|v| *v = false);
        self.position = network.super_source();
        trace!(ant = self.id, trip = self.trips, "trip abandoned");
    }
    /// Loads a full backpack, or whatever is left when that is less.
    pub(crate) fn begin_trip(&mut self, network: &FlowNetwork) {
        self.stack.clear();
        self.visited_arcs.iter_mut().for_each(|v| *v = false);
        self.on_path.iter_mut().for_each(|v| *v = false);
        self.position = network.super_source();
        self.on_path[self.position.index()] = true;
        self.load = config::trip_load(self.backpack, self.remaining);
    }
    /// Outgoing arcs that can still take the current load. Reversing the last
    /// step is always offered; other moves must pass the cycle guard.
    pub(crate) fn candidates(&self, network: &FlowNetwork) -> Vec<ArcIndex> {
        network.outgoings(self.position)
            .filter(|&arc| self.available[arc.index()] >= self.load)
            .filter(|&arc| self.is_backtrack(network, arc) || self.admits(network, arc))
            .collect()
    }
    /// A retreat that is not an undo would make the source absorb flow.
    fn admits(&self, network: &FlowNetwork, arc: ArcIndex) -> bool {
        !matches!(network.link(arc).kind, ArcKind::Retreat(_))
            && self.guard.admits(network, arc, &self.on_path)
    }
    /// Roulette-wheel choice over `candidates` in their given order.
    pub(crate) fn decide_arc_to_traverse(&mut self, candidates: &[ArcIndex], trail: &Trail) -> Option<ArcIndex> {
        let scores: Vec<f64> = candidates.iter()
            .map(|&arc| trail.score(arc))
            .collect();
        roulette::spin(&scores, &mut self.rng)
            .map(|i| candidates[i])
    }
    pub(crate) fn traverse(&mut self, network: &FlowNetwork, arc: ArcIndex) {
        let load = self.load;
        match self.stack.last().copied() {
            Some(top) if network.key(arc).reverses(network.key(top)) => {
                // undo the previous step instead of taking on new flow
                self.stack.pop();
                self.on_path[self.position.index()] = false;
                let i = top.index();
                self.assigned[i] -= load;
                self.available[i] += load;
                self.traveled[i] -= 1;
            }
            _ => {
                let i = arc.index();
                self.assigned[i] += load;
                self.available[i] -= load;
                self.traveled[i] += 1;
                self.stack.push(arc);
                self.on_path[network.key(arc).to.index()] = true;
                debug_assert!(self.available[i] >= 0.0);
            }
        }
        self.position = network.key(arc).to;
        self.visited_arcs[arc.index()] = true;
    }
    fn is_backtrack(&self, network: &FlowNetwork, arc: ArcIndex) -> bool {
        self.stack.last()
            .map_or(false, |&top| network.key(arc).reverses(network.key(top)))
    }
}

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use crate::network::{ArcIndex, ArcKind, FlowNetwork};
use super::TourCost;


/// Immutable snapshot of one complete flow assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
    target_flow: f64,
    cost: TourCost,
    source_flows: Vec<f64>,
    sink_flows: Vec<f64>,
    arc_flows: Vec<f64>,
    opened: Vec<bool>,
    provenance: String,
}

impl Solution {
    /// `arc_flows` is indexed by arc and covers connector arcs as well.
    pub fn new(network: &FlowNetwork, target_flow: f64, arc_flows: Vec<f64>, provenance: &str) -> Self {
        debug_assert_eq!(arc_flows.len(), network.arc_count());
        let mut source_flows = vec![0.0; network.source_count()];
        let mut sink_flows = vec![0.0; network.sink_count()];
        for arc in network.arcs() {
            let flow = arc_flows[arc.index()];
            match network.link(arc).kind {
                ArcKind::Supply(s)  => source_flows[s] += flow,
                ArcKind::Retreat(s) => source_flows[s] -= flow,
                ArcKind::Demand(t)  => sink_flows[t] += flow,
                ArcKind::Edge { .. } => {}
            }
        }
        let opened = arc_flows.iter().map(|&flow| flow > 0.0).collect_vec();
        let cost = TourCost::from_flows(network, &arc_flows);
        Solution {
            target_flow,
            cost,
            source_flows,
            sink_flows,
            arc_flows,
            opened,
            provenance: provenance.to_owned(),
        }
    }
    pub fn target_flow(&self) -> f64 {
        self.target_flow
    }
    pub fn total_cost(&self) -> f64 {
        self.cost.total()
    }
    pub fn cost(&self) -> &TourCost {
        &self.cost
    }
    pub fn source_flows(&self) -> &[f64] {
        &self.source_flows
    }
    pub fn sink_flows(&self) -> &[f64] {
        &self.sink_flows
    }
    pub fn arc_flows(&self) -> &[f64] {
        &self.arc_flows
    }
    pub fn arc_flow(&self, arc: ArcIndex) -> f64 {
        self.arc_flows[arc.index()]
    }
    pub fn is_open(&self, arc: ArcIndex) -> bool {
        self.opened[arc.index()]
    }
    pub fn open_arcs(&self) -> impl Iterator<Item=ArcIndex> + '_ {
        self.opened.iter()
            .positions(|&open| open)
            .map(ArcIndex::from)
    }
    pub fn delivered(&self) -> f64 {
        self.sink_flows.iter().sum()
    }
    pub fn provenance(&self) -> &str {
        &self.provenance
    }
    /// Percentage by which this solution is worse than `reference`, usually
    /// the cost reported by an exact or relaxed solver.
    pub fn optimality_gap(&self, reference: f64) -> f64 {
        (self.total_cost() / reference - 1.0) * 100.0
    }
}

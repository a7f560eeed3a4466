use std::fmt;
use serde::{Deserialize, Serialize};
use crate::network::{ArcKind, FlowNetwork};


/// Cost of one flow assignment, split by where it is incurred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TourCost {
    pub source: f64,
    pub sink: f64,
    pub fixed: f64,
    pub variable: f64,
}


impl TourCost {
    /// `flows` is indexed by arc. Retreat flow is charged negatively so that
    /// sources pay only for their net outflow.
    pub fn from_flows(network: &FlowNetwork, flows: &[f64]) -> Self {
        debug_assert_eq!(flows.len(), network.arc_count());
        let mut cost = TourCost::default();
        for arc in network.arcs() {
            let flow = flows[arc.index()];
            let link = network.link(arc);
            match link.kind {
                ArcKind::Supply(_)  => cost.source += link.variable_cost * flow,
                ArcKind::Retreat(_) => cost.source -= link.variable_cost * flow,
                ArcKind::Demand(_)  => cost.sink += link.variable_cost * flow,
                ArcKind::Edge { .. } if flow > 0.0 => {
                    cost.fixed += link.fixed_cost;
                    cost.variable += link.variable_cost * flow;
                }
                ArcKind::Edge { .. } => {}
            }
        }
        cost
    }
    pub fn total(&self) -> f64 {
        self.source + self.sink + self.fixed + self.variable
    }
}

impl fmt::Display for TourCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} (source {:.2}, sink {:.2}, fixed {:.2}, variable {:.2})",
               self.total(), self.source, self.sink, self.fixed, self.variable)
    }
}

mod topology;

pub use topology::{ArcIndex, ArcKey, ArcKind, FlowNetwork, Link, NodeIndex, NodeKind, Terminal};

/// Arcs taken on the current trip, most recent last.
pub type Path = Vec<ArcIndex>;

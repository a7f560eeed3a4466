use std::iter;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use crate::utils::error::Error;

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    fn new(ix: usize) -> Self {
        NodeIndex(ix)
    }
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeIndex {
    fn from(ix: usize) -> Self {
        NodeIndex::new(ix)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
pub struct ArcIndex(usize);

impl ArcIndex {
    fn new(ix: usize) -> Self {
        ArcIndex(ix)
    }
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ArcIndex {
    fn from(ix: usize) -> Self {
        ArcIndex::new(ix)
    }
}

/// One discrete capacity option of one edge, or a connector to a virtual node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArcKey {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub tier: usize,
}

impl ArcKey {
    pub fn new(from: NodeIndex, to: NodeIndex, tier: usize) -> Self {
        ArcKey { from, to, tier }
    }
    pub fn reverses(&self, other: &ArcKey) -> bool {
        self.from == other.to && self.to == other.from
    }
}

/// The payload is the ordinal of the source or sink in the network.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Source(usize),
    Sink(usize),
    Transshipment,
    SuperSource,
    SuperSink,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArcKind {
    Edge { edge: usize, tier: usize },
    Supply(usize),
    Retreat(usize),
    Demand(usize),
}

#[derive(Clone, Debug)]
pub struct Terminal {
    pub node: NodeIndex,
    pub capacity: f64,
    pub cost: f64,
}

#[derive(Clone, Debug)]
pub struct Link {
    pub key: ArcKey,
    pub kind: ArcKind,
    pub capacity: f64,
    pub fixed_cost: f64,
    pub variable_cost: f64,
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    arcs: Vec<ArcIndex>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self { kind, arcs: vec![] }
    }
}

/// A capacitated fixed-charge network. Every arc, connectors included, is
/// registered when it is added, so per-arc state can live in dense vectors.
#[derive(Clone, Debug)]
pub struct FlowNetwork {
    nodes: Vec<Node>,
    links: Vec<Link>,
    edges: Vec<(NodeIndex, NodeIndex)>,
    tiers: Vec<f64>,
    sources: Vec<Terminal>,
    sinks: Vec<Terminal>,
    registry: HashMap<ArcKey, ArcIndex>,
    node_count: usize,
}

impl FlowNetwork {
    /// Creates `node_count` transshipment nodes followed by the super-source
    /// and the super-sink.
    pub fn new(node_count: usize, tiers: Vec<f64>) -> Self {
        let nodes = iter::repeat_with(|| Node::new(NodeKind::Transshipment))
            .take(node_count)
            .chain(iter::once(Node::new(NodeKind::SuperSource)))
            .chain(iter::once(Node::new(NodeKind::SuperSink)))
            .collect();
        FlowNetwork {
            nodes,
            links: vec![],
            edges: vec![],
            tiers,
            sources: vec![],
            sinks: vec![],
            registry: HashMap::new(),
            node_count,
        }
    }
    pub fn node_count(&self) -> usize {
        self.node_count
    }
    pub fn arc_count(&self) -> usize {
        self.links.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
    pub fn tiers(&self) -> &[f64] {
        &self.tiers
    }
    pub fn sources(&self) -> &[Terminal] {
        &self.sources
    }
    pub fn sinks(&self) -> &[Terminal] {
        &self.sinks
    }
    pub fn super_source(&self) -> NodeIndex {
        NodeIndex::new(self.node_count)
    }
    pub fn super_sink(&self) -> NodeIndex {
        NodeIndex::new(self.node_count + 1)
    }
    pub fn kind(&self, node: NodeIndex) -> NodeKind {
        debug_assert!(node.index() < self.nodes.len());
        self.nodes[node.index()].kind
    }
    pub fn link(&self, arc: ArcIndex) -> &Link {
        debug_assert!(arc.index() < self.links.len());
        &self.links[arc.index()]
    }
    pub fn key(&self, arc: ArcIndex) -> &ArcKey {
        &self.link(arc).key
    }
    pub fn arc_index(&self, key: &ArcKey) -> Option<ArcIndex> {
        self.registry.get(key).copied()
    }
    pub fn arcs(&self) -> impl Iterator<Item=ArcIndex> {
        (0..self.links.len()).map(ArcIndex::new)
    }
    pub fn outgoings(&self, node: NodeIndex)
        -> impl Iterator<Item=ArcIndex> + '_ {
        debug_assert!(node.index() < self.nodes.len());
        self.nodes[node.index()].arcs.iter().cloned()
    }
    pub fn add_source(&mut self, node: usize, capacity: f64, cost: f64) -> Result<(), Error> {
        let ordinal = self.sources.len();
        self.claim_terminal(node, NodeKind::Source(ordinal))?;
        let node = NodeIndex::new(node);
        self.sources.push(Terminal { node, capacity, cost });
        let (hub, tier) = (self.super_source(), 0);
        self.register(ArcKey::new(hub, node, tier), ArcKind::Supply(ordinal), capacity, 0.0, cost)?;
        self.register(ArcKey::new(node, hub, tier), ArcKind::Retreat(ordinal), capacity, 0.0, cost)?;
        Ok(())
    }
    pub fn add_sink(&mut self, node: usize, capacity: f64, cost: f64) -> Result<(), Error> {
        let ordinal = self.sinks.len();
        self.claim_terminal(node, NodeKind::Sink(ordinal))?;
        let node = NodeIndex::new(node);
        self.sinks.push(Terminal { node, capacity, cost });
        let hub = self.super_sink();
        self.register(ArcKey::new(node, hub, 0), ArcKind::Demand(ordinal), capacity, 0.0, cost)?;
        Ok(())
    }
    /// Adds one directed edge with a fixed and a variable cost for every tier.
    pub fn add_edge(&mut self, ends: (usize, usize), fixed: &[f64], variable: &[f64]) -> Result<(), Error> {
        let (end0, end1) = ends;
        if end0 >= self.node_count || end1 >= self.node_count || end0 == end1 {
            return Err(Error::InvalidNetwork(format!("edge {:?} is out of range or a loop", ends)));
        }
        if fixed.len() != self.tiers.len() || variable.len() != self.tiers.len() {
            return Err(Error::InvalidNetwork(format!(
                "edge {:?} lists {}/{} costs for {} tiers",
                ends, fixed.len(), variable.len(), self.tiers.len())));
        }
        let (from, to) = (NodeIndex::new(end0), NodeIndex::new(end1));
        if self.registry.contains_key(&ArcKey::new(from, to, 0)) {
            return Err(Error::InvalidNetwork(format!("edge {:?} is added twice", ends)));
        }
        let edge = self.edges.len();
        self.edges.push((from, to));
        for tier in 0..self.tiers.len() {
            let kind = ArcKind::Edge { edge, tier };
            let capacity = self.tiers[tier];
            self.register(ArcKey::new(from, to, tier), kind, capacity, fixed[tier], variable[tier])?;
        }
        Ok(())
    }
    fn claim_terminal(&mut self, node: usize, kind: NodeKind) -> Result<(), Error> {
        match self.nodes.get(node).map(|n| n.kind) {
            Some(NodeKind::Transshipment) if node < self.node_count => {
                self.nodes[node].kind = kind;
                Ok(())
            }
            Some(other) if node < self.node_count => Err(Error::InvalidNetwork(
                format!("node {} is already a {:?}", node, other))),
            _ => Err(Error::InvalidNetwork(format!("node {} is out of range", node))),
        }
    }
    fn register(&mut self, key: ArcKey, kind: ArcKind, capacity: f64,
                fixed_cost: f64, variable_cost: f64) -> Result<(), Error> {
        let arc = ArcIndex::new(self.links.len());
        if self.registry.insert(key, arc).is_some() {
            return Err(Error::InvalidNetwork(format!("arc {:?} is registered twice", key)));
        }
        self.nodes[key.from.index()].arcs.push(arc);
        self.links.push(Link { key, kind, capacity, fixed_cost, variable_cost });
        Ok(())
    }
}

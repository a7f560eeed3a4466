use std::fs;

use serde::Deserialize;

use super::config::Config;
use super::error::Error;
use crate::network::FlowNetwork;

#[derive(Deserialize)]
struct NetworkYaml {
    scale: NetworkScaleYaml,
    tiers: Vec<f64>,
    sources: Vec<TerminalYaml>,
    sinks: Vec<TerminalYaml>,
    edges: Vec<NetworkEdgeYaml>,
}

#[derive(Deserialize)]
struct NetworkScaleYaml {
    nodes: usize,
    sources: usize,
    sinks: usize,
    edges: usize,
}

#[derive(Deserialize)]
struct TerminalYaml {
    node: usize,
    capacity: f64,
    cost: f64,
}

#[derive(Deserialize)]
struct NetworkEdgeYaml {
    ends: [usize; 2],
    fixed: Vec<f64>,
    variable: Vec<f64>,
}

pub fn load_network(path: &str) -> Result<FlowNetwork, Error> {
    let text = fs::read_to_string(path)?;
    parse_network(&text)
}

pub fn parse_network(text: &str) -> Result<FlowNetwork, Error> {
    let yaml: NetworkYaml = serde_yaml::from_str(text)?;
    check_scale(&yaml)?;
    let mut network = FlowNetwork::new(yaml.scale.nodes, yaml.tiers);
    for source in yaml.sources {
        network.add_source(source.node, source.capacity, source.cost)?;
    }
    for sink in yaml.sinks {
        network.add_sink(sink.node, sink.capacity, sink.cost)?;
    }
    for edge in yaml.edges {
        network.add_edge((edge.ends[0], edge.ends[1]), &edge.fixed, &edge.variable)?;
    }
    Ok(network)
}

pub fn load_config(path: &str) -> Result<Config, Error> {
    let text = fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&text)?;
    Ok(config)
}

fn check_scale(yaml: &NetworkYaml) -> Result<(), Error> {
    let declared = (yaml.scale.sources, yaml.scale.sinks, yaml.scale.edges);
    let listed = (yaml.sources.len(), yaml.sinks.len(), yaml.edges.len());
    if declared != listed {
        return Err(Error::InvalidNetwork(format!(
            "scale declares {:?} sources/sinks/edges but {:?} are listed", declared, listed)));
    }
    if yaml.tiers.is_empty() {
        return Err(Error::InvalidNetwork(String::from("at least one capacity tier is required")));
    }
    Ok(())
}

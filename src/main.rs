use fcnf_ant::algorithm::Colony;
use fcnf_ant::component::Solution;
use fcnf_ant::network::{ArcKind, FlowNetwork};
use fcnf_ant::utils::config::Arguments;
use fcnf_ant::utils::error::Error;
use fcnf_ant::utils::{json, yaml};
use std::fmt::Write;
use std::process;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Arguments = argh::from_env();
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(args: Arguments) -> Result<(), Error> {
    let mut config = yaml::load_config(&args.config)?;
    config.override_from_args(&args);
    let network = yaml::load_network(&args.network)?;

    let start = Instant::now();
    let mut colony = Colony::new(&network, config)?;
    let best = colony.solve()?;
    let elapsed = start.elapsed().as_micros();

    print!("{}", show_results(&network, &colony, &best));
    println!("--- computing time: {} μs ---", elapsed);
    if let Some(output) = args.output {
        json::save_solution(&output, &best)?;
    }
    Ok(())
}

fn show_results(network: &FlowNetwork, colony: &Colony, best: &Solution) -> String {
    let mut msg = String::new();
    writeln!(msg, "sources").unwrap();
    for (s, flow) in best.source_flows().iter().enumerate() {
        let terminal = &network.sources()[s];
        writeln!(msg, "- source #{:02} at node {:?}: {} / {}",
                 s, terminal.node.index(), flow, terminal.capacity).unwrap();
    }
    writeln!(msg, "sinks").unwrap();
    for (t, flow) in best.sink_flows().iter().enumerate() {
        let terminal = &network.sinks()[t];
        writeln!(msg, "- sink #{:02} at node {:?}: {} / {}",
                 t, terminal.node.index(), flow, terminal.capacity).unwrap();
    }
    writeln!(msg, "opened arcs").unwrap();
    for arc in best.open_arcs() {
        let link = network.link(arc);
        if let ArcKind::Edge { tier, .. } = link.kind {
            writeln!(msg, "- {} -> {} on tier #{} ({}): {}",
                     link.key.from.index(), link.key.to.index(),
                     tier, link.capacity, best.arc_flow(arc)).unwrap();
        }
    }
    let convergence: Vec<String> = colony.convergence().iter()
        .map(|cost| cost.map_or(String::from("-"), |c| format!("{:.1}", c)))
        .collect();
    writeln!(msg, "best cost per episode: [{}]", convergence.join(", ")).unwrap();
    writeln!(msg, "the solution has cost {}", best.cost()).unwrap();
    msg
}

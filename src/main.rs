use anyhow::{bail, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use distance_vector_rs::cli::Args;
use distance_vector_rs::config::load_topology;
use distance_vector_rs::daemon::RouterDaemon;

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("routingd: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    init_logging(&args.log_level)?;

    let Some(node) = args.node else {
        bail!("missing required argument: node");
    };

    let mut chars = node.chars();
    let home_name = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => bail!("node name must be a single character, got {node:?}"),
    };

    let topology = load_topology(&args.nodes, &args.links, home_name)?;
    let bind_address = topology.local.ip.clone();
    let bind_port = topology.local.port;

    let mut daemon = RouterDaemon::new(topology, &bind_address, bind_port)?;
    daemon.run_forever()
}

fn init_logging(level: &str) -> Result<()> {
    let level = level.parse::<Level>()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .init();
    Ok(())
}

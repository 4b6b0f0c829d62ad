use std::path::PathBuf;

use clap::Parser;

/// Single positional argument: the local node's name. The `--nodes`/
/// `--links` flags exist so config file locations are not hardcoded.
#[derive(Debug, Parser)]
#[command(name = "routingd")]
#[command(about = "Distance-vector routing daemon exchanging Bellman-Ford cost vectors over UDP")]
pub struct Args {
    /// Single-character name of this node, as it appears in the node
    /// address table. Optional at the clap layer so a missing argument is
    /// reported through the same fatal-error path as other startup
    /// failures (exit code 1), rather than clap's own usage-error exit.
    pub node: Option<String>,

    #[arg(long, default_value = "node.config")]
    pub nodes: PathBuf,

    #[arg(long, default_value = "neighbor.config")]
    pub links: PathBuf,

    #[arg(long, default_value = "INFO")]
    pub log_level: String,
}

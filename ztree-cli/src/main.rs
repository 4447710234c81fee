//! ztree — replicate an object store prefix into a coordination tree.
//!
//! # Usage
//!
//! ```text
//! ztree status --bucket <name> [--prefix <p>] [--json]
//! ztree sync   --bucket <name> [--prefix <p>] [--dry-run] [--keep-going]
//! ztree tree   [PATH]
//! ```
//!
//! Connection settings come from flags with environment fallbacks
//! (`ZK_HOST`, `AWS_REGION`); see `--help` on each subcommand.

mod commands;
mod config;
mod s3;
mod zk;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{status::StatusArgs, sync::SyncArgs, tree::TreeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "ztree",
    version,
    about = "Reconcile a flat object store prefix into a hierarchical coordination tree",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show per-object classification without writing anything.
    Status(StatusArgs),

    /// Diff the listing against the tree and upload what differs.
    Sync(SyncArgs),

    /// List the leaf node paths under a tree path.
    Tree(TreeArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Tree(args) => args.run(),
    }
}

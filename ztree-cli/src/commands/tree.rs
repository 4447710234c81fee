//! `ztree tree` — list leaf node paths under a tree path.

use anyhow::{Context, Result};
use clap::Args;

use ztree_sync::walk;

use crate::config::StoreOpts;

/// Arguments for `ztree tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Root path to walk.
    #[arg(default_value = "/")]
    pub path: String,

    #[command(flatten)]
    pub store: StoreOpts,
}

impl TreeArgs {
    pub fn run(self) -> Result<()> {
        let tree = self.store.connect_tree()?;
        let leaves = walk::leaf_paths(&tree, &self.path)
            .with_context(|| format!("failed to walk tree under {}", self.path))?;
        for leaf in &leaves {
            println!("{leaf}");
        }
        log::info!("{} leaf node(s) under {}", leaves.len(), self.path);
        Ok(())
    }
}

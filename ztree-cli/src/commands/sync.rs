//! `ztree sync` — diff the bucket listing against the tree and upload.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use ztree_core::{BucketName, SyncAction, SyncPlan};
use ztree_sync::{FailurePolicy, Syncer};

use crate::config::StoreOpts;

/// Arguments for `ztree sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Source bucket name.
    #[arg(long)]
    pub bucket: String,

    /// Listing prefix within the bucket.
    #[arg(long, default_value = "/")]
    pub prefix: String,

    /// Compute and print the plan without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep syncing the remaining objects after a failure instead of
    /// stopping at the first one.
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub store: StoreOpts,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let tree = self.store.connect_tree()?;
        let objects = self.store.connect_objects(&self.bucket)?;

        let policy = if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        };
        let syncer = Syncer::new(&objects, &tree).with_policy(policy);
        let bucket = BucketName::from(self.bucket.as_str());

        let plan = syncer
            .compute_plan(&bucket, &self.prefix)
            .context("failed to compute sync plan")?;

        if self.dry_run {
            print_plan(&plan, true);
            return Ok(());
        }
        if !plan.needs_sync() {
            println!("✓ '{}/{}' — nothing to do", plan.bucket, plan.prefix);
            return Ok(());
        }

        let outcome = syncer.apply_plan(plan);
        print_plan(&outcome.plan, false);
        if !outcome.is_success() {
            for failure in &outcome.failures {
                eprintln!("{} {}: {}", "✗".red().bold(), failure.key, failure.error);
            }
            bail!("{} object(s) failed to sync", outcome.failures.len());
        }
        Ok(())
    }
}

fn print_plan(plan: &SyncPlan, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = plan
        .records
        .iter()
        .filter(|r| r.needs_write && r.synced)
        .count();
    let in_sync = plan.records.iter().filter(|r| !r.needs_write).count();
    let pending = plan.records.len() - written - in_sync;

    println!(
        "{prefix}'{}/{}' — {written} written, {in_sync} in sync, {pending} pending",
        plan.bucket, plan.prefix,
    );
    for record in &plan.records {
        let marker = match (record.action(), record.synced) {
            (SyncAction::InSync, _) => "·".normal(),
            (_, true) => "✎".green(),
            (SyncAction::Create, false) => "+".yellow(),
            (SyncAction::Update, false) => "~".yellow(),
            (SyncAction::Unknown, false) => "?".red(),
        };
        println!("  {marker}  {}", record.target_path);
    }
}

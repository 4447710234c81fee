//! `ztree status` — per-object classification without writes.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use ztree_core::{BucketName, SyncAction, SyncPlan};
use ztree_sync::Syncer;

use crate::config::StoreOpts;

/// Arguments for `ztree status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Source bucket name.
    #[arg(long)]
    pub bucket: String,

    /// Listing prefix within the bucket.
    #[arg(long, default_value = "/")]
    pub prefix: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreOpts,
}

#[derive(Serialize)]
struct PlanJson {
    bucket: String,
    prefix: String,
    needs_sync: bool,
    objects: Vec<ObjectJson>,
}

#[derive(Serialize)]
struct ObjectJson {
    key: String,
    path: String,
    action: SyncAction,
    fingerprint: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let tree = self.store.connect_tree()?;
        let objects = self.store.connect_objects(&self.bucket)?;
        let syncer = Syncer::new(&objects, &tree);

        let plan = syncer
            .compute_plan(&BucketName::from(self.bucket.as_str()), &self.prefix)
            .context("failed to compute sync plan")?;

        if self.json {
            print_json(&plan)?;
        } else {
            print_report(&plan);
        }
        Ok(())
    }
}

fn print_json(plan: &SyncPlan) -> Result<()> {
    let payload = PlanJson {
        bucket: plan.bucket.to_string(),
        prefix: plan.prefix.clone(),
        needs_sync: plan.needs_sync(),
        objects: plan
            .records
            .iter()
            .map(|record| ObjectJson {
                key: record.key.to_string(),
                path: record.target_path.to_string(),
                action: record.action(),
                fingerprint: record.source_fingerprint.clone(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_report(plan: &SyncPlan) {
    println!(
        "'{}/{}' — {} object(s), sync needed: {}",
        plan.bucket,
        plan.prefix,
        plan.records.len(),
        plan.needs_sync(),
    );
    for record in &plan.records {
        let label = match record.action() {
            SyncAction::InSync => "IN SYNC".green(),
            SyncAction::Create => "CREATE ".yellow(),
            SyncAction::Update => "UPDATE ".yellow(),
            SyncAction::Unknown => "UNKNOWN".red(),
        };
        println!("  {label}  {}  ({})", record.target_path, record.key);
    }
    if plan.needs_sync() {
        println!("Run 'ztree sync' to upload the pending objects.");
    }
}

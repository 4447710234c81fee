//! Shared connection configuration.
//!
//! Everything is an explicit flag with an environment fallback; nothing in
//! the engine reads ambient process state.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::s3::S3ObjectStore;
use crate::zk::ZkTreeStore;

/// Connection options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreOpts {
    /// Tree store connect string (host:port[,host:port...]).
    #[arg(long, env = "ZK_HOST", default_value = "127.0.0.1:2181")]
    pub zk_hosts: String,

    /// Region of the source bucket.
    #[arg(long, env = "AWS_REGION", default_value = "eu-west-1")]
    pub region: String,

    /// Connection-level timeout in seconds. Individual calls carry no
    /// deadline once the session is up.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

impl StoreOpts {
    pub fn connect_tree(&self) -> Result<ZkTreeStore> {
        ZkTreeStore::connect(
            &self.zk_hosts,
            Duration::from_secs(self.connect_timeout_secs),
        )
        .with_context(|| format!("failed to connect to tree store at {}", self.zk_hosts))
    }

    pub fn connect_objects(&self, bucket: &str) -> Result<S3ObjectStore> {
        S3ObjectStore::connect(bucket, &self.region)
            .with_context(|| format!("failed to open bucket {bucket} in {}", self.region))
    }
}

//! Sync orchestration: listing → diff → materialize → write.

use ztree_core::{BucketName, ObjectKey, ObjectRecord, SyncPlan};

use crate::ancestors;
use crate::diff;
use crate::error::SyncError;
use crate::store::{ObjectStore, StoreError, TreeAcl, TreeStore};

/// What `apply_plan` does after an object fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; later records stay unclassified.
    #[default]
    FailFast,
    /// Record the failure and keep syncing the remaining objects.
    KeepGoing,
}

/// One object that failed to sync.
#[derive(Debug)]
pub struct SyncFailure {
    pub key: ObjectKey,
    pub error: SyncError,
}

/// Result of one `apply_plan` run: the plan as far as it got, plus any
/// per-object failures. Under [`FailurePolicy::FailFast`] there is at most
/// one failure and the records after it are untouched.
#[derive(Debug)]
pub struct SyncOutcome {
    pub plan: SyncPlan,
    pub failures: Vec<SyncFailure>,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consume the outcome, yielding the plan or the first failure.
    pub fn into_result(self) -> Result<SyncPlan, SyncFailure> {
        match self.failures.into_iter().next() {
            None => Ok(self.plan),
            Some(failure) => Err(failure),
        }
    }
}

/// Drives one reconciliation run over borrowed store handles.
///
/// The syncer never owns the connections and never closes them; it holds
/// them only for the duration of the calls made on it.
pub struct Syncer<'a, O: ObjectStore + ?Sized, T: TreeStore + ?Sized> {
    objects: &'a O,
    tree: &'a T,
    policy: FailurePolicy,
    acl: TreeAcl,
}

impl<'a, O: ObjectStore + ?Sized, T: TreeStore + ?Sized> Syncer<'a, O, T> {
    pub fn new(objects: &'a O, tree: &'a T) -> Self {
        Self {
            objects,
            tree,
            policy: FailurePolicy::default(),
            acl: TreeAcl::world_anyone(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// ACL applied to every created node, ancestors included.
    pub fn with_acl(mut self, acl: TreeAcl) -> Self {
        self.acl = acl;
        self
    }

    /// List the source store and classify every object against the tree.
    ///
    /// An empty prefix lists from the root. The returned plan is this run's
    /// exclusive state; feed it to [`Syncer::apply_plan`] when
    /// [`SyncPlan::needs_sync`] says there is work.
    pub fn compute_plan(&self, bucket: &BucketName, prefix: &str) -> Result<SyncPlan, SyncError> {
        if bucket.is_empty() {
            return Err(SyncError::EmptyBucket);
        }
        let prefix = if prefix.is_empty() { "/" } else { prefix };
        log::info!("listing {bucket}/{prefix}");

        let listing = self
            .objects
            .list(bucket, prefix)
            .map_err(|source| SyncError::List {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                source,
            })?;
        let records: Vec<ObjectRecord> = listing
            .iter()
            .map(|entry| ObjectRecord::from_listing(prefix, entry))
            .collect();
        log::info!("listed {} objects under {bucket}/{prefix}", records.len());

        let records = diff::classify(self.tree, &records)?;
        Ok(SyncPlan {
            bucket: bucket.clone(),
            prefix: prefix.to_string(),
            records,
        })
    }

    /// Write every record that needs it, in listing order.
    ///
    /// Per record: fetch the object's bytes, materialize ancestors, then
    /// create the leaf (absent) or issue a versioned update (present) with
    /// the version read at the write-time existence check. A failure either
    /// aborts the run or is collected, per the configured [`FailurePolicy`].
    pub fn apply_plan(&self, mut plan: SyncPlan) -> SyncOutcome {
        log::info!(
            "replicating {}/{} to the tree store",
            plan.bucket,
            plan.prefix
        );
        let mut failures = Vec::new();

        for record in plan.records.iter_mut() {
            if !record.needs_write {
                continue;
            }
            match self.sync_record(&plan.bucket, record) {
                Ok(()) => {
                    record.synced = true;
                    log::info!(
                        "synced {}/{} to {}",
                        plan.bucket,
                        record.key,
                        record.target_path
                    );
                }
                Err(error) => {
                    log::error!("failed to sync {}: {error}", record.key);
                    failures.push(SyncFailure {
                        key: record.key.clone(),
                        error,
                    });
                    if self.policy == FailurePolicy::FailFast {
                        break;
                    }
                }
            }
        }

        SyncOutcome { plan, failures }
    }

    fn sync_record(&self, bucket: &BucketName, record: &ObjectRecord) -> Result<(), SyncError> {
        let path = record.target_path.as_str();
        log::debug!("downloading {bucket}/{}", record.key);
        let data = self
            .objects
            .get_bytes(bucket, &record.key)
            .map_err(|source| match source {
                StoreError::NotFound => SyncError::ObjectVanished {
                    bucket: bucket.to_string(),
                    key: record.key.to_string(),
                },
                source => SyncError::Fetch {
                    bucket: bucket.to_string(),
                    key: record.key.to_string(),
                    source,
                },
            })?;

        ancestors::ensure_ancestors(self.tree, &record.target_path, &self.acl)?;
        self.write_leaf(path, &data)
    }

    /// Create the leaf if absent, else update with the version just read.
    fn write_leaf(&self, path: &str, data: &[u8]) -> Result<(), SyncError> {
        let version = self.tree.exists(path).map_err(|source| SyncError::Exists {
            path: path.to_string(),
            source,
        })?;
        match version {
            Some(version) => {
                log::debug!("updating node {path} at version {version}");
                self.tree
                    .update(path, data, version)
                    .map_err(|source| match source {
                        StoreError::VersionConflict => SyncError::WriteConflict {
                            path: path.to_string(),
                            version: Some(version),
                        },
                        source => SyncError::Write {
                            path: path.to_string(),
                            source,
                        },
                    })
            }
            None => {
                log::debug!("creating node {path}");
                self.tree
                    .create(path, data, &self.acl)
                    .map_err(|source| match source {
                        // Lost a create race; same retry story as a stale
                        // version token.
                        StoreError::AlreadyExists => SyncError::WriteConflict {
                            path: path.to_string(),
                            version: None,
                        },
                        source => SyncError::Write {
                            path: path.to_string(),
                            source,
                        },
                    })
            }
        }
    }
}

//! ZooKeeper adapter for the tree store boundary.

use std::time::Duration;

use anyhow::{Context, Result};
use zookeeper::{Acl, CreateMode, Permission, WatchedEvent, Watcher, ZkError, ZooKeeper};

use ztree_core::NodeVersion;
use ztree_sync::{StoreError, TreeAcl, TreeStore};

struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        log::debug!("tree store session event: {event:?}");
    }
}

/// Blocking ZooKeeper client behind the [`TreeStore`] trait.
pub struct ZkTreeStore {
    zk: ZooKeeper,
}

impl ZkTreeStore {
    pub fn connect(hosts: &str, timeout: Duration) -> Result<Self> {
        log::info!("connecting to tree store at {hosts}");
        let zk = ZooKeeper::connect(hosts, timeout, SessionWatcher)
            .context("tree store connection failed")?;
        Ok(Self { zk })
    }
}

fn map_err(err: ZkError) -> StoreError {
    match err {
        ZkError::NoNode => StoreError::NotFound,
        ZkError::NodeExists => StoreError::AlreadyExists,
        ZkError::BadVersion => StoreError::VersionConflict,
        other => StoreError::backend(other),
    }
}

/// Standard permission bits, low to high: read, write, create, delete,
/// admin.
fn to_permission(perms: u32) -> Permission {
    let mut mapped = Permission::NONE;
    for (bit, permission) in [
        (0b00001, Permission::READ),
        (0b00010, Permission::WRITE),
        (0b00100, Permission::CREATE),
        (0b01000, Permission::DELETE),
        (0b10000, Permission::ADMIN),
    ] {
        if perms & bit != 0 {
            mapped = mapped | permission;
        }
    }
    mapped
}

fn to_zk_acl(acl: &TreeAcl) -> Vec<Acl> {
    vec![Acl::new(
        to_permission(acl.perms),
        acl.scheme.clone(),
        acl.id.clone(),
    )]
}

impl TreeStore for ZkTreeStore {
    fn exists(&self, path: &str) -> Result<Option<NodeVersion>, StoreError> {
        let stat = self.zk.exists(path, false).map_err(map_err)?;
        Ok(stat.map(|stat| NodeVersion(stat.version)))
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let (data, _stat) = self.zk.get_data(path, false).map_err(map_err)?;
        Ok(data)
    }

    fn create(&self, path: &str, data: &[u8], acl: &TreeAcl) -> Result<(), StoreError> {
        self.zk
            .create(path, data.to_vec(), to_zk_acl(acl), CreateMode::Persistent)
            .map_err(map_err)?;
        Ok(())
    }

    fn update(&self, path: &str, data: &[u8], version: NodeVersion) -> Result<(), StoreError> {
        self.zk
            .set_data(path, data.to_vec(), Some(version.0))
            .map_err(map_err)?;
        Ok(())
    }

    fn children(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.zk.get_children(path, false).map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_bits_compose_from_constants() {
        assert!(to_permission(31).can(Permission::ALL));
        assert!(to_permission(5).can(Permission::READ));
        assert!(to_permission(5).can(Permission::CREATE));
        assert!(!to_permission(5).can(Permission::WRITE));
        assert!(!to_permission(0).can(Permission::READ));
    }

    #[test]
    fn default_acl_translates_to_open_world_entry() {
        let entries = to_zk_acl(&TreeAcl::world_anyone());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].scheme, "world");
        assert_eq!(entries[0].id, "anyone");
        assert!(entries[0].perms.can(Permission::ALL));
    }
}

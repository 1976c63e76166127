//! Free-space probe backed by `sysinfo::Disks`.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::StorageInfo,
};
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::debug;

/// Reports the available space of the disk mounted under `path`.
pub struct SysinfoStorageInfo {
    path: PathBuf,
}

impl SysinfoStorageInfo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// The entry with the longest mount point that is a prefix of `path`.
fn containing_mount<'a, I>(path: &Path, mounts: I) -> Option<u64>
where
    I: IntoIterator<Item = (&'a Path, u64)>,
{
    mounts
        .into_iter()
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.as_os_str().len())
        .map(|(_, available)| available)
}

#[async_trait]
impl StorageInfo for SysinfoStorageInfo {
    async fn storage_path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }

    async fn available_bytes(&self) -> Result<u64> {
        let path = self.path.clone();

        // Enumerating disks touches every mount; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let disks = Disks::new_with_refreshed_list();
            let resolved = path.canonicalize().unwrap_or(path);
            let available = containing_mount(
                &resolved,
                disks
                    .list()
                    .iter()
                    .map(|disk| (disk.mount_point(), disk.available_space())),
            );
            debug!(disks = disks.list().len(), "Probed disks for free space");
            available.ok_or_else(|| {
                BridgeError::NotAvailable("no disk is mounted for the storage path".to_string())
            })
        })
        .await
        .map_err(|e| BridgeError::OperationFailed(format!("disk probe task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_mount_wins() {
        let mounts = vec![
            (Path::new("/"), 10),
            (Path::new("/home"), 20),
            (Path::new("/home/ana/media"), 30),
        ];

        assert_eq!(
            containing_mount(Path::new("/home/ana/.local/share"), mounts.clone()),
            Some(20)
        );
        assert_eq!(
            containing_mount(Path::new("/home/ana/media/x"), mounts.clone()),
            Some(30)
        );
        assert_eq!(containing_mount(Path::new("/var"), mounts), Some(10));
    }

    #[test]
    fn test_no_matching_mount() {
        let mounts = vec![(Path::new("/data"), 1)];
        assert_eq!(containing_mount(Path::new("/home"), mounts), None);
    }

    #[tokio::test]
    async fn test_storage_path_is_reported() {
        let storage = SysinfoStorageInfo::new("/tmp");
        assert_eq!(storage.storage_path().await.unwrap(), PathBuf::from("/tmp"));
    }
}

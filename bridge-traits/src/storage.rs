//! Storage volume abstraction
//!
//! Reports free space on the volume that backs the application's files.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;

/// Free-space query for the app storage volume.
///
/// - **Android**: `StatFs(getExternalFilesDir(null))`
/// - **iOS**: `volumeAvailableCapacity` of the home directory
/// - **Desktop**: the disk mounted under the user's data directory
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::StorageInfo;
///
/// async fn free_mb(storage: &dyn StorageInfo) -> Result<u64> {
///     Ok(storage.available_bytes().await? / (1024 * 1024))
/// }
/// ```
#[async_trait]
pub trait StorageInfo: Send + Sync {
    /// The path whose volume is measured.
    ///
    /// Returns [`BridgeError::NotAvailable`](crate::BridgeError::NotAvailable)
    /// when the platform exposes no accessible storage path.
    async fn storage_path(&self) -> Result<PathBuf>;

    /// Bytes available to the application on that volume.
    async fn available_bytes(&self) -> Result<u64>;
}

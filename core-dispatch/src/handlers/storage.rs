use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::StorageInfo;
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::debug;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// `freeStorage`: free space of the app storage volume as `"<n> MB free"`.
pub struct FreeStorageHandler {
    storage: Arc<dyn StorageInfo>,
}

impl FreeStorageHandler {
    pub fn new(storage: Arc<dyn StorageInfo>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CapabilityHandler for FreeStorageHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        let path = self
            .storage
            .storage_path()
            .await
            .map_err(|e| HandlerError::internal(format!("Storage not accessible: {}", e)))?;

        let available = self
            .storage
            .available_bytes()
            .await
            .map_err(|e| HandlerError::internal(format!("Storage not accessible: {}", e)))?;

        debug!(
            volume = %strip_path(&path.to_string_lossy()),
            available,
            "Measured free storage"
        );

        Ok(Value::Text(format!("{} MB free", available / BYTES_PER_MB)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use std::path::PathBuf;

    struct Volume {
        path: Option<PathBuf>,
        available: u64,
    }

    #[async_trait]
    impl StorageInfo for Volume {
        async fn storage_path(&self) -> BridgeResult<PathBuf> {
            self.path
                .clone()
                .ok_or_else(|| BridgeError::NotAvailable("external storage".to_string()))
        }

        async fn available_bytes(&self) -> BridgeResult<u64> {
            Ok(self.available)
        }
    }

    async fn free(path: Option<&str>, available: u64) -> Result<Value> {
        FreeStorageHandler::new(Arc::new(Volume {
            path: path.map(PathBuf::from),
            available,
        }))
        .invoke(&Arguments::new())
        .await
    }

    #[tokio::test]
    async fn test_whole_megabytes() {
        let value = free(Some("/data"), 5 * BYTES_PER_MB + 123).await.unwrap();
        assert_eq!(value, Value::from("5 MB free"));
    }

    #[tokio::test]
    async fn test_less_than_a_megabyte() {
        let value = free(Some("/data"), BYTES_PER_MB - 1).await.unwrap();
        assert_eq!(value, Value::from("0 MB free"));
    }

    #[tokio::test]
    async fn test_no_storage_path() {
        let err = free(None, 0).await.unwrap_err();
        assert!(matches!(err, HandlerError::Internal(msg) if msg.starts_with("Storage not accessible")));
    }
}

//! Runtime permission state.
//!
//! Permission flags are owned by the operating system. The bridge only reads
//! them, through a provider injected at construction time, so permission-gated
//! handlers can be exercised deterministically with a fake provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Permissions consulted by capability handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Fine or coarse location access.
    Location,
    /// Writing files to shared storage.
    StorageWrite,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Location => "location",
            Permission::StorageWrite => "storage_write",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet. Treated as not granted.
    NotDetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Permission query trait
///
/// - **Android**: `ActivityCompat.checkSelfPermission` (fine OR coarse for location)
/// - **iOS**: `CLLocationManager.authorizationStatus`
/// - **Desktop**: a static grant set chosen by the host
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Query the current state of `permission`.
    async fn status(&self, permission: Permission) -> Result<PermissionStatus>;

    /// Convenience check: `true` only for an explicit grant.
    ///
    /// A failing query counts as not granted.
    async fn is_granted(&self, permission: Permission) -> bool {
        matches!(self.status(permission).await, Ok(PermissionStatus::Granted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    struct FailingProvider;

    #[async_trait]
    impl PermissionProvider for FailingProvider {
        async fn status(&self, _permission: Permission) -> Result<PermissionStatus> {
            Err(BridgeError::NotAvailable("permission service".to_string()))
        }
    }

    #[test]
    fn test_status_is_granted() {
        assert!(PermissionStatus::Granted.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
        assert!(!PermissionStatus::NotDetermined.is_granted());
    }

    #[test]
    fn test_permission_display() {
        assert_eq!(Permission::Location.to_string(), "location");
        assert_eq!(Permission::StorageWrite.to_string(), "storage_write");
    }

    #[tokio::test]
    async fn test_failed_query_is_not_granted() {
        assert!(!FailingProvider.is_granted(Permission::Location).await);
    }
}

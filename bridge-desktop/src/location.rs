//! Host-configured location and permission state.
//!
//! Desktop platforms expose neither a cached GPS fix nor a runtime permission
//! prompt, so both are fixed by the host at startup.

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    location::{Coordinates, LocationService},
    permission::{Permission, PermissionProvider, PermissionStatus},
};
use std::collections::HashSet;

/// Location service that always reports the same fix (or none).
#[derive(Debug, Clone, Default)]
pub struct FixedLocationService {
    fix: Option<Coordinates>,
}

impl FixedLocationService {
    pub fn new(fix: Option<Coordinates>) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationService for FixedLocationService {
    async fn last_known_location(&self) -> Result<Option<Coordinates>> {
        Ok(self.fix)
    }
}

/// Permission provider backed by a fixed grant set.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionProvider {
    granted: HashSet<Permission>,
}

impl StaticPermissionProvider {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PermissionProvider for StaticPermissionProvider {
    async fn status(&self, permission: Permission) -> Result<PermissionStatus> {
        Ok(if self.granted.contains(&permission) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}

//! Settings for the desktop fallbacks.

use bridge_traits::{Coordinates, Permission};
use std::collections::HashSet;
use std::path::PathBuf;

/// Tunables for the desktop adapters.
///
/// Desktop operating systems have no runtime permission prompt for the
/// capabilities the bridge exposes, so grants are decided up front by the
/// host.
#[derive(Debug, Clone)]
pub struct DesktopOptions {
    /// Permissions reported as granted. Everything else reads as denied.
    pub granted_permissions: HashSet<Permission>,
    /// Position reported by the location service. `None` means "no fix".
    pub fixed_location: Option<Coordinates>,
    /// Path whose volume is reported by `freeStorage`
    pub storage_path: Option<PathBuf>,
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for DesktopOptions {
    fn default() -> Self {
        Self {
            granted_permissions: HashSet::from([Permission::StorageWrite]),
            fixed_location: None,
            storage_path: None,
            screenshot_dir: None,
        }
    }
}

impl DesktopOptions {
    pub fn grant(mut self, permission: Permission) -> Self {
        self.granted_permissions.insert(permission);
        self
    }

    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.fixed_location = Some(location);
        self
    }
}

/// The user's pictures directory, or the temp dir when there is none.
pub fn default_screenshot_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(std::env::temp_dir)
}

/// Per-user application data directory, or the home directory as fallback.
pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
}

//! Device identity abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Static device facts.
///
/// Both values are expected to stay constant for the lifetime of the process,
/// so repeated calls must return identical strings.
///
/// - **Android**: `"Android " + Build.VERSION.RELEASE`, `Build.MODEL`
/// - **iOS**: `"iOS " + UIDevice.systemVersion`, `UIDevice.model`
/// - **Desktop**: OS name and version, DMI product name
#[async_trait]
pub trait DeviceInfo: Send + Sync {
    /// Platform name followed by its version, e.g. `"Android 14"`.
    async fn platform_version(&self) -> Result<String>;

    /// Hardware model name, e.g. `"Pixel 8"` or `"iPhone"`.
    async fn device_model(&self) -> Result<String>;
}

//! Device identity from `sysinfo` and the firmware tables.

use async_trait::async_trait;
use bridge_traits::{device::DeviceInfo, error::Result};
use std::path::PathBuf;
use sysinfo::System;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::debug;

const DMI_PRODUCT_NAME: &str = "/sys/devices/virtual/dmi/id/product_name";

/// Desktop device info.
///
/// Both values are resolved once and cached, so repeated queries return the
/// same string even if the underlying probe would be flaky.
pub struct SysinfoDeviceInfo {
    dmi_product_path: PathBuf,
    platform: OnceCell<String>,
    model: OnceCell<String>,
}

impl SysinfoDeviceInfo {
    pub fn new() -> Self {
        Self::with_dmi_path(DMI_PRODUCT_NAME)
    }

    /// Read the model from a different DMI file (used by tests).
    pub fn with_dmi_path(path: impl Into<PathBuf>) -> Self {
        Self {
            dmi_product_path: path.into(),
            platform: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    async fn probe_model(&self) -> String {
        if cfg!(target_os = "macos") {
            if let Some(model) = sysctl_hw_model().await {
                return model;
            }
        }

        match tokio::fs::read_to_string(&self.dmi_product_path).await {
            Ok(name) if !name.trim().is_empty() => return name.trim().to_string(),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "DMI product name not readable"),
        }

        fallback_model()
    }
}

impl Default for SysinfoDeviceInfo {
    fn default() -> Self {
        Self::new()
    }
}

async fn sysctl_hw_model() -> Option<String> {
    let output = Command::new("sysctl")
        .args(["-n", "hw.model"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let model = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!model.is_empty()).then_some(model)
}

fn fallback_model() -> String {
    format!("{} desktop", std::env::consts::ARCH)
}

fn platform_string() -> String {
    let name = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    match System::os_version() {
        Some(version) if !version.is_empty() => format!("{} {}", name, version),
        _ => name,
    }
}

#[async_trait]
impl DeviceInfo for SysinfoDeviceInfo {
    async fn platform_version(&self) -> Result<String> {
        let platform = self
            .platform
            .get_or_init(|| async { platform_string() })
            .await;
        Ok(platform.clone())
    }

    async fn device_model(&self) -> Result<String> {
        let model = self.model.get_or_init(|| self.probe_model()).await;
        Ok(model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_platform_version_is_stable() {
        let info = SysinfoDeviceInfo::new();
        let first = info.platform_version().await.unwrap();
        let second = info.platform_version().await.unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_model_read_from_dmi_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("product_name");
        std::fs::write(&path, "ThinkPad X1 Carbon\n").unwrap();

        let info = SysinfoDeviceInfo::with_dmi_path(&path);
        assert_eq!(info.device_model().await.unwrap(), "ThinkPad X1 Carbon");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_model_falls_back_without_dmi() {
        let dir = tempdir().unwrap();
        let info = SysinfoDeviceInfo::with_dmi_path(dir.path().join("missing"));

        let model = info.device_model().await.unwrap();
        assert_eq!(model, fallback_model());
        assert_eq!(info.device_model().await.unwrap(), model);
    }
}

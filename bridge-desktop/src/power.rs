//! Battery level from the OS power supply interfaces.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    power::PowerSource,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

const SYSFS_POWER_SUPPLY: &str = "/sys/class/power_supply";
const PMSET_TIMEOUT: Duration = Duration::from_secs(5);

/// Desktop power source
///
/// - **Linux**: first `Battery`-typed entry under `/sys/class/power_supply`
/// - **macOS**: `pmset -g batt`
/// - **Other**: not available
///
/// Desktops without a battery report [`BridgeError::NotAvailable`].
pub struct DesktopPowerSource {
    sysfs_root: PathBuf,
}

impl DesktopPowerSource {
    pub fn new() -> Self {
        Self::with_sysfs_root(SYSFS_POWER_SUPPLY)
    }

    /// Read power supplies from a different directory (used by tests).
    pub fn with_sysfs_root(root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: root.into(),
        }
    }

    async fn read_sysfs(&self) -> Result<i64> {
        let mut entries = tokio::fs::read_dir(&self.sysfs_root).await.map_err(|e| {
            BridgeError::NotAvailable(format!("power supply class not readable: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            let supply = entry.path();
            let kind = tokio::fs::read_to_string(supply.join("type"))
                .await
                .unwrap_or_default();
            if kind.trim() != "Battery" {
                continue;
            }

            let capacity = tokio::fs::read_to_string(supply.join("capacity")).await?;
            debug!(supply = ?entry.file_name(), "Reading battery capacity");
            return capacity.trim().parse::<i64>().map_err(|e| {
                BridgeError::OperationFailed(format!("unparsable battery capacity: {}", e))
            });
        }

        Err(BridgeError::NotAvailable("no battery present".to_string()))
    }

    async fn read_pmset(&self) -> Result<i64> {
        let output = tokio::time::timeout(
            PMSET_TIMEOUT,
            Command::new("pmset").arg("-g").arg("batt").output(),
        )
        .await
        .map_err(|_| BridgeError::OperationFailed("pmset timed out".to_string()))??;

        if !output.status.success() {
            return Err(BridgeError::OperationFailed(
                "pmset exited with an error".to_string(),
            ));
        }

        parse_pmset_percentage(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| BridgeError::NotAvailable("no battery present".to_string()))
    }
}

impl Default for DesktopPowerSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the charge from `pmset -g batt` output, e.g.
/// `" -InternalBattery-0 (id=1234)\t85%; charging; 1:02 remaining"`.
fn parse_pmset_percentage(output: &str) -> Option<i64> {
    output
        .lines()
        .filter(|line| line.contains("InternalBattery"))
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ';'))
        .find_map(|token| token.strip_suffix('%')?.parse().ok())
}

#[async_trait]
impl PowerSource for DesktopPowerSource {
    async fn battery_percentage(&self) -> Result<i64> {
        if cfg!(target_os = "macos") {
            self.read_pmset().await
        } else if cfg!(target_os = "linux") {
            self.read_sysfs().await
        } else {
            Err(BridgeError::NotAvailable(format!(
                "battery level is not supported on {}",
                std::env::consts::OS
            )))
        }
    }
}

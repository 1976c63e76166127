//! # Bridge Configuration Module
//!
//! Collects every platform collaborator the capability handlers need, plus the
//! few settings that shape their behavior.
//!
//! ## Overview
//!
//! [`BridgeConfig`] is assembled with a builder and validated fail-fast: a
//! configuration that reaches the dispatcher is complete. Each handler gets
//! exactly the collaborators it uses, so the config is the only place that
//! knows about all of them.
//!
//! ## Platform Collaborators
//!
//! - `DeviceInfo` - OS version and hardware model
//! - `PowerSource` - battery charge
//! - `StorageInfo` - free space on the app storage volume
//! - `LocationService` - last known location fix
//! - `PermissionProvider` - runtime permission state
//! - `UiExecutor` - the UI-owning thread
//! - `AlertPresenter` - native alert dialogs (runs on the UI thread)
//! - `ScreenCapture` - reads back the screen (runs on the UI thread)
//! - `Clock` - stamps screenshot file names (defaults to the system clock)
//!
//! When the `desktop-shims` feature is enabled, desktop implementations from
//! `bridge-desktop` fill in anything not provided. Without it, a missing
//! collaborator is a [`Error::CapabilityMissing`] with guidance per platform.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use std::sync::Arc;
//!
//! let config = BridgeConfig::builder()
//!     .power_source(Arc::new(MyBatteryManager))
//!     .alert_presenter(Arc::new(MyDialogPresenter))
//!     .screenshot_dir("/data/user/0/app/files")
//!     .require_storage_permission(true)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    AlertPresenter, Clock, DeviceInfo, LocationService, PermissionProvider, PowerSource,
    ScreenCapture, StorageInfo, SystemClock, UiExecutor,
};
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::DesktopOptions;

/// Title shown on alerts raised through `showAlert`.
pub const DEFAULT_ALERT_TITLE: &str = "Native Alert";

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Complete configuration for a bridge instance.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    pub device_info: Arc<dyn DeviceInfo>,
    pub power_source: Arc<dyn PowerSource>,
    pub storage_info: Arc<dyn StorageInfo>,
    pub location_service: Arc<dyn LocationService>,
    pub permissions: Arc<dyn PermissionProvider>,
    pub ui_executor: Arc<dyn UiExecutor>,
    pub alert_presenter: Arc<dyn AlertPresenter>,
    pub screen_capture: Arc<dyn ScreenCapture>,
    pub clock: Arc<dyn Clock>,

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,

    /// Gate `takeScreenshot` on the storage-write permission.
    ///
    /// Off by default: the default screenshot directory is app-private.
    pub require_storage_permission: bool,

    pub alert_title: String,

    /// Per-subscriber buffer of the invocation event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("device_info", &"DeviceInfo { ... }")
            .field("power_source", &"PowerSource { ... }")
            .field("storage_info", &"StorageInfo { ... }")
            .field("location_service", &"LocationService { ... }")
            .field("permissions", &"PermissionProvider { ... }")
            .field("ui_executor", &"UiExecutor { ... }")
            .field("alert_presenter", &"AlertPresenter { ... }")
            .field("screen_capture", &"ScreenCapture { ... }")
            .field("screenshot_dir", &self.screenshot_dir)
            .field(
                "require_storage_permission",
                &self.require_storage_permission,
            )
            .field("alert_title", &self.alert_title)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl BridgeConfig {
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Screenshot directory is not empty
    /// - Alert title is not blank
    /// - Event buffer size is in `1..=10_000`
    pub fn validate(&self) -> Result<()> {
        if self.screenshot_dir.as_os_str().is_empty() {
            return Err(Error::Config(
                "Screenshot directory cannot be empty".to_string(),
            ));
        }

        if self.alert_title.trim().is_empty() {
            return Err(Error::Config("Alert title cannot be blank".to_string()));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

/// Fallbacks for collaborators the host did not inject.
#[cfg(feature = "desktop-shims")]
mod defaults {
    use super::*;
    use bridge_desktop::{
        CommandScreenCapture, DedicatedUiThread, DesktopPowerSource, FixedLocationService,
        StaticPermissionProvider, SysinfoDeviceInfo, SysinfoStorageInfo,
    };

    pub(super) fn device_info(_: &DesktopOptions) -> Result<Arc<dyn DeviceInfo>> {
        Ok(Arc::new(SysinfoDeviceInfo::new()))
    }

    pub(super) fn power_source(_: &DesktopOptions) -> Result<Arc<dyn PowerSource>> {
        Ok(Arc::new(DesktopPowerSource::new()))
    }

    pub(super) fn storage_info(options: &DesktopOptions) -> Result<Arc<dyn StorageInfo>> {
        let path = options
            .storage_path
            .clone()
            .unwrap_or_else(bridge_desktop::default_storage_path);
        Ok(Arc::new(SysinfoStorageInfo::new(path)))
    }

    pub(super) fn location_service(options: &DesktopOptions) -> Result<Arc<dyn LocationService>> {
        Ok(Arc::new(FixedLocationService::new(options.fixed_location)))
    }

    pub(super) fn permissions(options: &DesktopOptions) -> Result<Arc<dyn PermissionProvider>> {
        Ok(Arc::new(StaticPermissionProvider::new(
            options.granted_permissions.iter().copied(),
        )))
    }

    pub(super) fn ui_executor(_: &DesktopOptions) -> Result<Arc<dyn UiExecutor>> {
        let executor = DedicatedUiThread::spawn().map_err(|e| {
            Error::Internal(format!("Failed to start default UI thread: {}", e))
        })?;
        Ok(Arc::new(executor))
    }

    pub(super) fn alert_presenter(_: &DesktopOptions) -> Result<Arc<dyn AlertPresenter>> {
        Ok(bridge_desktop::default_alert_presenter())
    }

    pub(super) fn screen_capture(_: &DesktopOptions) -> Result<Arc<dyn ScreenCapture>> {
        Ok(Arc::new(CommandScreenCapture::new()))
    }

    pub(super) fn screenshot_dir(options: &DesktopOptions) -> PathBuf {
        options
            .screenshot_dir
            .clone()
            .unwrap_or_else(bridge_desktop::default_screenshot_dir)
    }
}

#[cfg(not(feature = "desktop-shims"))]
mod defaults {
    use super::*;

    /// Stand-in for the desktop options when no desktop shims are compiled in.
    #[derive(Debug, Clone, Default)]
    pub(super) struct NoDefaults;

    fn missing(capability: &str, purpose: &str, mobile: &str) -> Error {
        Error::CapabilityMissing {
            capability: capability.to_string(),
            message: format!(
                "{} implementation is required {}. \
                 Desktop: enable the 'desktop-shims' feature to use the bundled default. \
                 Mobile: inject {}.",
                capability, purpose, mobile
            ),
        }
    }

    pub(super) fn device_info(_: &NoDefaults) -> Result<Arc<dyn DeviceInfo>> {
        Err(missing(
            "DeviceInfo",
            "for platformVersion and deviceModel",
            "a wrapper over Build.VERSION/Build.MODEL or UIDevice",
        ))
    }

    pub(super) fn power_source(_: &NoDefaults) -> Result<Arc<dyn PowerSource>> {
        Err(missing(
            "PowerSource",
            "for batteryLevel",
            "BatteryManager or UIDevice.batteryLevel",
        ))
    }

    pub(super) fn storage_info(_: &NoDefaults) -> Result<Arc<dyn StorageInfo>> {
        Err(missing(
            "StorageInfo",
            "for freeStorage",
            "StatFs or volumeAvailableCapacityForImportantUsage",
        ))
    }

    pub(super) fn location_service(_: &NoDefaults) -> Result<Arc<dyn LocationService>> {
        Err(missing(
            "LocationService",
            "for location",
            "LocationManager.getLastKnownLocation or CLLocationManager.location",
        ))
    }

    pub(super) fn permissions(_: &NoDefaults) -> Result<Arc<dyn PermissionProvider>> {
        Err(missing(
            "PermissionProvider",
            "for permission-gated commands",
            "checkSelfPermission or CLLocationManager.authorizationStatus",
        ))
    }

    pub(super) fn ui_executor(_: &NoDefaults) -> Result<Arc<dyn UiExecutor>> {
        Err(missing(
            "UiExecutor",
            "for showAlert and takeScreenshot",
            "a main-looper Handler or DispatchQueue.main",
        ))
    }

    pub(super) fn alert_presenter(_: &NoDefaults) -> Result<Arc<dyn AlertPresenter>> {
        Err(missing(
            "AlertPresenter",
            "for showAlert",
            "AlertDialog or UIAlertController",
        ))
    }

    pub(super) fn screen_capture(_: &NoDefaults) -> Result<Arc<dyn ScreenCapture>> {
        Err(missing(
            "ScreenCapture",
            "for takeScreenshot",
            "PixelCopy or UIWindow.drawHierarchy",
        ))
    }

    pub(super) fn screenshot_dir(_: &NoDefaults) -> PathBuf {
        std::env::temp_dir()
    }
}

#[cfg(feature = "desktop-shims")]
type PlatformOptions = DesktopOptions;
#[cfg(not(feature = "desktop-shims"))]
type PlatformOptions = defaults::NoDefaults;

/// Builder for [`BridgeConfig`].
///
/// Every collaborator is optional here; [`build()`](BridgeConfigBuilder::build)
/// fills gaps from the desktop shims or fails with an actionable message.
#[derive(Default)]
pub struct BridgeConfigBuilder {
    device_info: Option<Arc<dyn DeviceInfo>>,
    power_source: Option<Arc<dyn PowerSource>>,
    storage_info: Option<Arc<dyn StorageInfo>>,
    location_service: Option<Arc<dyn LocationService>>,
    permissions: Option<Arc<dyn PermissionProvider>>,
    ui_executor: Option<Arc<dyn UiExecutor>>,
    alert_presenter: Option<Arc<dyn AlertPresenter>>,
    screen_capture: Option<Arc<dyn ScreenCapture>>,
    clock: Option<Arc<dyn Clock>>,
    screenshot_dir: Option<PathBuf>,
    require_storage_permission: bool,
    alert_title: Option<String>,
    event_buffer_size: Option<usize>,
    platform: PlatformOptions,
}

impl BridgeConfigBuilder {
    pub fn device_info(mut self, device_info: Arc<dyn DeviceInfo>) -> Self {
        self.device_info = Some(device_info);
        self
    }

    pub fn power_source(mut self, power_source: Arc<dyn PowerSource>) -> Self {
        self.power_source = Some(power_source);
        self
    }

    pub fn storage_info(mut self, storage_info: Arc<dyn StorageInfo>) -> Self {
        self.storage_info = Some(storage_info);
        self
    }

    pub fn location_service(mut self, location_service: Arc<dyn LocationService>) -> Self {
        self.location_service = Some(location_service);
        self
    }

    pub fn permissions(mut self, permissions: Arc<dyn PermissionProvider>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Sets the executor for the UI-owning thread.
    ///
    /// Alerts and screen capture run on it; everything else runs on the
    /// async runtime.
    pub fn ui_executor(mut self, ui_executor: Arc<dyn UiExecutor>) -> Self {
        self.ui_executor = Some(ui_executor);
        self
    }

    pub fn alert_presenter(mut self, alert_presenter: Arc<dyn AlertPresenter>) -> Self {
        self.alert_presenter = Some(alert_presenter);
        self
    }

    pub fn screen_capture(mut self, screen_capture: Arc<dyn ScreenCapture>) -> Self {
        self.screen_capture = Some(screen_capture);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the directory screenshots are saved to.
    ///
    /// The directory is created on first capture if it does not exist.
    pub fn screenshot_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    pub fn require_storage_permission(mut self, required: bool) -> Self {
        self.require_storage_permission = required;
        self
    }

    pub fn alert_title(mut self, title: impl Into<String>) -> Self {
        self.alert_title = Some(title.into());
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Tunes the desktop fallbacks used for collaborators not set explicitly.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop_options(mut self, options: DesktopOptions) -> Self {
        self.platform = options;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if a collaborator was not provided and
    ///   no desktop fallback is compiled in
    /// - [`Error::Config`] if validation fails
    pub fn build(self) -> Result<BridgeConfig> {
        let platform = &self.platform;

        let device_info = match self.device_info {
            Some(device_info) => device_info,
            None => defaults::device_info(platform)?,
        };
        let power_source = match self.power_source {
            Some(power_source) => power_source,
            None => defaults::power_source(platform)?,
        };
        let storage_info = match self.storage_info {
            Some(storage_info) => storage_info,
            None => defaults::storage_info(platform)?,
        };
        let location_service = match self.location_service {
            Some(location_service) => location_service,
            None => defaults::location_service(platform)?,
        };
        let permissions = match self.permissions {
            Some(permissions) => permissions,
            None => defaults::permissions(platform)?,
        };
        let alert_presenter = match self.alert_presenter {
            Some(alert_presenter) => alert_presenter,
            None => defaults::alert_presenter(platform)?,
        };
        let screen_capture = match self.screen_capture {
            Some(screen_capture) => screen_capture,
            None => defaults::screen_capture(platform)?,
        };
        // Last, so a failure above does not leave a UI thread behind.
        let ui_executor = match self.ui_executor {
            Some(ui_executor) => ui_executor,
            None => defaults::ui_executor(platform)?,
        };

        let config = BridgeConfig {
            device_info,
            power_source,
            storage_info,
            location_service,
            permissions,
            ui_executor,
            alert_presenter,
            screen_capture,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            screenshot_dir: self
                .screenshot_dir
                .unwrap_or_else(|| defaults::screenshot_dir(platform)),
            require_storage_permission: self.require_storage_permission,
            alert_title: self
                .alert_title
                .unwrap_or_else(|| DEFAULT_ALERT_TITLE.to_string()),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        Alert, BridgeError, Coordinates, Frame, Permission, PermissionStatus, UiJob,
    };

    struct StubDevice;

    #[async_trait]
    impl DeviceInfo for StubDevice {
        async fn platform_version(&self) -> BridgeResult<String> {
            Ok("Test OS 1".to_string())
        }

        async fn device_model(&self) -> BridgeResult<String> {
            Ok("Test Device".to_string())
        }
    }

    struct StubPower;

    #[async_trait]
    impl PowerSource for StubPower {
        async fn battery_percentage(&self) -> BridgeResult<i64> {
            Ok(50)
        }
    }

    struct StubStorage;

    #[async_trait]
    impl StorageInfo for StubStorage {
        async fn storage_path(&self) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from("/data"))
        }

        async fn available_bytes(&self) -> BridgeResult<u64> {
            Ok(0)
        }
    }

    struct StubLocation;

    #[async_trait]
    impl LocationService for StubLocation {
        async fn last_known_location(&self) -> BridgeResult<Option<Coordinates>> {
            Ok(None)
        }
    }

    struct StubPermissions;

    #[async_trait]
    impl PermissionProvider for StubPermissions {
        async fn status(&self, _permission: Permission) -> BridgeResult<PermissionStatus> {
            Ok(PermissionStatus::Denied)
        }
    }

    struct InlineExecutor;

    impl UiExecutor for InlineExecutor {
        fn post(&self, job: UiJob) -> BridgeResult<()> {
            job();
            Ok(())
        }
    }

    struct StubPresenter;

    impl AlertPresenter for StubPresenter {
        fn present(&self, _alert: &Alert) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct StubCapture;

    impl ScreenCapture for StubCapture {
        fn capture(&self) -> BridgeResult<Frame> {
            Err(BridgeError::NotAvailable("no screen".to_string()))
        }
    }

    fn fully_injected() -> BridgeConfigBuilder {
        BridgeConfig::builder()
            .device_info(Arc::new(StubDevice))
            .power_source(Arc::new(StubPower))
            .storage_info(Arc::new(StubStorage))
            .location_service(Arc::new(StubLocation))
            .permissions(Arc::new(StubPermissions))
            .ui_executor(Arc::new(InlineExecutor))
            .alert_presenter(Arc::new(StubPresenter))
            .screen_capture(Arc::new(StubCapture))
            .screenshot_dir("/tmp/shots")
    }

    #[test]
    fn test_build_with_all_collaborators() {
        let config = fully_injected().build().unwrap();

        assert_eq!(config.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(config.alert_title, DEFAULT_ALERT_TITLE);
        assert!(!config.require_storage_permission);
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_builder_overrides() {
        let config = fully_injected()
            .alert_title("Heads up")
            .require_storage_permission(true)
            .event_buffer_size(16)
            .build()
            .unwrap();

        assert_eq!(config.alert_title, "Heads up");
        assert!(config.require_storage_permission);
        assert_eq!(config.event_buffer_size, 16);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let result = fully_injected().alert_title("   ").build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Alert title")));
    }

    #[test]
    fn test_validate_rejects_empty_screenshot_dir() {
        let result = fully_injected().screenshot_dir("").build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Screenshot")));
    }

    #[test]
    fn test_validate_rejects_event_buffer_bounds() {
        assert!(fully_injected().event_buffer_size(0).build().is_err());
        assert!(fully_injected().event_buffer_size(10_001).build().is_err());
        assert!(fully_injected().event_buffer_size(10_000).build().is_ok());
    }

    #[test]
    fn test_debug_hides_collaborators() {
        let config = fully_injected().build().unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("PowerSource { ... }"));
        assert!(debug.contains("/tmp/shots"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_collaborator_is_actionable() {
        let result = BridgeConfig::builder()
            .device_info(Arc::new(StubDevice))
            .build();

        match result {
            Err(Error::CapabilityMissing {
                capability,
                message,
            }) => {
                assert_eq!(capability, "PowerSource");
                assert!(message.contains("desktop-shims"));
                assert!(message.contains("Mobile"));
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_defaults_fill_gaps() {
        let dir = std::env::temp_dir().join("capbridge-config-test");
        let config = BridgeConfig::builder()
            .desktop_options(DesktopOptions {
                screenshot_dir: Some(dir.clone()),
                ..DesktopOptions::default()
            })
            .build()
            .unwrap();

        assert_eq!(config.screenshot_dir, dir);
    }
}

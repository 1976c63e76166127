//! # Desktop Bridge Implementations
//!
//! Default implementations of the collaborator traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `DeviceInfo` using `sysinfo` and the DMI product name
//! - `PowerSource` using `/sys/class/power_supply` or `pmset`
//! - `StorageInfo` using `sysinfo::Disks`
//! - `LocationService` and `PermissionProvider` fixed by [`DesktopOptions`]
//! - `UiExecutor` as a dedicated thread draining a job queue
//! - `AlertPresenter` on stderr, or a native message box with `native-dialogs`
//! - `ScreenCapture` through the OS screenshot tool, decoded with `image`
//!
//! ## Feature Flags
//!
//! - `native-dialogs`: present alerts with `rfd` message boxes
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DedicatedUiThread, SysinfoDeviceInfo};
//! use bridge_traits::DeviceInfo;
//!
//! #[tokio::main]
//! async fn main() {
//!     let device = SysinfoDeviceInfo::new();
//!     println!("{}", device.platform_version().await.unwrap());
//!
//!     let ui = DedicatedUiThread::spawn().unwrap();
//!     // Use in core configuration
//! }
//! ```

mod capture;
mod device;
mod location;
mod options;
mod power;
mod storage;
mod ui;

pub use capture::CommandScreenCapture;
pub use device::SysinfoDeviceInfo;
pub use location::{FixedLocationService, StaticPermissionProvider};
pub use options::{default_screenshot_dir, default_storage_path, DesktopOptions};
pub use power::DesktopPowerSource;
pub use storage::SysinfoStorageInfo;
pub use ui::{default_alert_presenter, DedicatedUiThread, TerminalAlertPresenter};

#[cfg(feature = "native-dialogs")]
pub use ui::DialogAlertPresenter;

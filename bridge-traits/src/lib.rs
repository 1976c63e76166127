//! # Host Bridge Traits
//!
//! Platform collaborator traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the capability handlers and the
//! platform-specific services they consume. Each trait represents one OS-level
//! service that a handler needs but that must be implemented differently per
//! platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Device state
//! - [`DeviceInfo`](device::DeviceInfo) - Platform name/version and device model
//! - [`PowerSource`](power::PowerSource) - Battery charge reading
//! - [`StorageInfo`](storage::StorageInfo) - Free space of the app storage volume
//!
//! ### Location & Permissions
//! - [`LocationService`](location::LocationService) - Last known position fix
//! - [`PermissionProvider`](permission::PermissionProvider) - Runtime permission state
//!
//! ### UI thread
//! - [`UiExecutor`](ui::UiExecutor) - Runs jobs on the UI-owning thread
//! - [`AlertPresenter`](ui::AlertPresenter) - Presents a native alert dialog
//! - [`ScreenCapture`](capture::ScreenCapture) - Grabs the current screen pixels
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | iOS      | host-injected       | 📋 Planned |
//! | Android  | host-injected       | 📋 Planned |
//!
//! ## Error Handling
//!
//! All collaborator traits use [`BridgeError`](error::BridgeError). Implementations
//! should report a missing service or hardware as `NotAvailable`, a refused
//! permission as `PermissionDenied`, and any other platform fault as
//! `OperationFailed` with a human-readable description.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so a single collaborator instance can be
//! shared by concurrently running handlers. Methods documented as "called on
//! the UI thread" are only ever invoked from inside a [`UiExecutor`] job.

pub mod capture;
pub mod device;
pub mod error;
pub mod location;
pub mod permission;
pub mod power;
pub mod storage;
pub mod time;
pub mod ui;

pub use error::BridgeError;

// Re-export commonly used types
pub use capture::{Frame, ScreenCapture};
pub use device::DeviceInfo;
pub use location::{Coordinates, LocationService};
pub use permission::{Permission, PermissionProvider, PermissionStatus};
pub use power::PowerSource;
pub use storage::StorageInfo;
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
pub use ui::{run_on_ui, Alert, AlertPresenter, UiExecutor, UiJob};

//! Capability handlers, one per command.
//!
//! Each handler holds only the collaborators it needs. Argument parsing and
//! failure classification live here; routing, panic isolation and reply
//! delivery are the dispatcher's job.

mod alert;
mod battery;
mod device;
mod location;
mod screenshot;
mod storage;

pub use alert::{ShowAlertHandler, DEFAULT_ALERT_MESSAGE};
pub use battery::BatteryLevelHandler;
pub use device::{DeviceModelHandler, PlatformVersionHandler};
pub use location::{LocationHandler, LOCATION_UNAVAILABLE};
pub use screenshot::TakeScreenshotHandler;
pub use storage::FreeStorageHandler;

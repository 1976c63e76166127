//! Fakes for the platform collaborators shared by the dispatch tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    Alert, AlertPresenter, Clock, Coordinates, DeviceInfo, Frame, LocationService, Permission,
    PermissionProvider, PermissionStatus, PowerSource, ScreenCapture, StorageInfo, UiExecutor,
    UiJob,
};
use chrono::{DateTime, TimeZone, Utc};
use core_runtime::config::{BridgeConfig, BridgeConfigBuilder};
use mockall::mock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

pub const UI_THREAD: &str = "fake-ui";

mock! {
    pub Power {}

    #[async_trait]
    impl PowerSource for Power {
        async fn battery_percentage(&self) -> BridgeResult<i64>;
    }
}

mock! {
    pub Location {}

    #[async_trait]
    impl LocationService for Location {
        async fn last_known_location(&self) -> BridgeResult<Option<Coordinates>>;
    }
}

mock! {
    pub Device {}

    #[async_trait]
    impl DeviceInfo for Device {
        async fn platform_version(&self) -> BridgeResult<String>;
        async fn device_model(&self) -> BridgeResult<String>;
    }
}

pub struct FakeDevice;

#[async_trait]
impl DeviceInfo for FakeDevice {
    async fn platform_version(&self) -> BridgeResult<String> {
        Ok("Android 14".to_string())
    }

    async fn device_model(&self) -> BridgeResult<String> {
        Ok("Pixel 8".to_string())
    }
}

pub struct FixedPower(pub i64);

#[async_trait]
impl PowerSource for FixedPower {
    async fn battery_percentage(&self) -> BridgeResult<i64> {
        Ok(self.0)
    }
}

pub struct FakeStorage {
    pub available: u64,
}

#[async_trait]
impl StorageInfo for FakeStorage {
    async fn storage_path(&self) -> BridgeResult<PathBuf> {
        Ok(PathBuf::from("/storage/emulated/0"))
    }

    async fn available_bytes(&self) -> BridgeResult<u64> {
        Ok(self.available)
    }
}

pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationService for FixedLocation {
    async fn last_known_location(&self) -> BridgeResult<Option<Coordinates>> {
        Ok(self.0)
    }
}

/// Grants exactly the permissions it was built with.
pub struct Grants(pub HashSet<Permission>);

impl Grants {
    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn of(permissions: &[Permission]) -> Self {
        Self(permissions.iter().copied().collect())
    }
}

#[async_trait]
impl PermissionProvider for Grants {
    async fn status(&self, permission: Permission) -> BridgeResult<PermissionStatus> {
        Ok(if self.0.contains(&permission) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}

/// Runs every job on a fresh thread named [`UI_THREAD`].
pub struct ThreadUi;

impl UiExecutor for ThreadUi {
    fn post(&self, job: UiJob) -> BridgeResult<()> {
        thread::Builder::new()
            .name(UI_THREAD.to_string())
            .spawn(job)
            .map(|_| ())
            .map_err(BridgeError::Io)
    }
}

/// Records every alert together with the thread it was presented on.
#[derive(Default)]
pub struct RecordingPresenter {
    pub presented: Mutex<Vec<(Alert, Option<String>)>>,
}

impl RecordingPresenter {
    pub fn alerts(&self) -> Vec<Alert> {
        self.presented
            .lock()
            .unwrap()
            .iter()
            .map(|(alert, _)| alert.clone())
            .collect()
    }

    pub fn threads(&self) -> Vec<Option<String>> {
        self.presented
            .lock()
            .unwrap()
            .iter()
            .map(|(_, thread)| thread.clone())
            .collect()
    }
}

impl AlertPresenter for RecordingPresenter {
    fn present(&self, alert: &Alert) -> BridgeResult<()> {
        let thread = thread::current().name().map(str::to_string);
        self.presented.lock().unwrap().push((alert.clone(), thread));
        Ok(())
    }
}

/// A solid-color frame of the given size.
pub struct SolidCapture {
    pub width: u32,
    pub height: u32,
}

impl ScreenCapture for SolidCapture {
    fn capture(&self) -> BridgeResult<Frame> {
        let pixels = vec![0x80; (self.width * self.height * 4) as usize];
        Frame::new(self.width, self.height, pixels)
    }
}

pub struct FailingCapture;

impl ScreenCapture for FailingCapture {
    fn capture(&self) -> BridgeResult<Frame> {
        Err(BridgeError::OperationFailed("window has no surface".to_string()))
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A builder with every collaborator faked, writing screenshots to `dir`.
pub fn fake_config(dir: &Path) -> BridgeConfigBuilder {
    BridgeConfig::builder()
        .device_info(Arc::new(FakeDevice))
        .power_source(Arc::new(FixedPower(42)))
        .storage_info(Arc::new(FakeStorage {
            available: 2048 * 1024 * 1024,
        }))
        .location_service(Arc::new(FixedLocation(None)))
        .permissions(Arc::new(Grants::none()))
        .ui_executor(Arc::new(ThreadUi))
        .alert_presenter(Arc::new(RecordingPresenter::default()))
        .screen_capture(Arc::new(SolidCapture {
            width: 8,
            height: 6,
        }))
        .clock(Arc::new(FixedClock::at_millis(1_700_000_000_000)))
        .screenshot_dir(dir)
}

/// Entries of `dir`, or nothing if it does not exist.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

//! The fixed set of capability commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability operation the bridge knows how to route.
///
/// The set is closed at build time. Names outside it are not commands at all;
/// the registry answers them with `UnknownCommand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    PlatformVersion,
    BatteryLevel,
    DeviceModel,
    FreeStorage,
    Location,
    ShowAlert,
    TakeScreenshot,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::PlatformVersion,
        Command::BatteryLevel,
        Command::DeviceModel,
        Command::FreeStorage,
        Command::Location,
        Command::ShowAlert,
        Command::TakeScreenshot,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::PlatformVersion => "platformVersion",
            Command::BatteryLevel => "batteryLevel",
            Command::DeviceModel => "deviceModel",
            Command::FreeStorage => "freeStorage",
            Command::Location => "location",
            Command::ShowAlert => "showAlert",
            Command::TakeScreenshot => "takeScreenshot",
        }
    }

    /// Resolve a wire name, accepting the canonical name or its
    /// method-channel alias (`getBatteryLevel` and friends).
    ///
    /// Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Command> {
        let command = match name {
            "platformVersion" | "getPlatformVersion" => Command::PlatformVersion,
            "batteryLevel" | "getBatteryLevel" => Command::BatteryLevel,
            "deviceModel" | "getDeviceModel" => Command::DeviceModel,
            "freeStorage" | "getFreeStorage" => Command::FreeStorage,
            "location" | "getLocation" => Command::Location,
            "showAlert" => Command::ShowAlert,
            "takeScreenshot" => Command::TakeScreenshot,
            _ => return None,
        };
        Some(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Location Service Abstraction
//!
//! Provides the last position fix known to the platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Location service trait
///
/// Implementations only read the cached fix; they never start a fresh
/// positioning session and never prompt for permission. Permission gating is
/// the caller's job (see [`PermissionProvider`](crate::permission::PermissionProvider)).
///
/// # Platform Support
///
/// - **Android**: `LocationManager.getLastKnownLocation(GPS_PROVIDER)`
/// - **iOS**: `CLLocationManager.location`
/// - **Desktop**: a fix configured by the host, if any
///
/// Shared handles (a single `CLLocationManager`, for instance) must serialise
/// their own access; callers may invoke this concurrently.
#[async_trait]
pub trait LocationService: Send + Sync {
    /// The last known fix, or `None` when the platform has not obtained one yet.
    async fn last_known_location(&self) -> Result<Option<Coordinates>>;
}

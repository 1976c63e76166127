use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::{LocationService, Permission, PermissionProvider};
use std::sync::Arc;
use tracing::debug;

/// Returned when permission is granted but the platform has no fix yet.
pub const LOCATION_UNAVAILABLE: &str = "unavailable";

/// `location`: last known fix as `"Lat: <lat>, Lng: <lng>"`.
///
/// The permission check runs before the location service is touched, so a
/// denied caller never triggers platform location access.
pub struct LocationHandler {
    location: Arc<dyn LocationService>,
    permissions: Arc<dyn PermissionProvider>,
}

impl LocationHandler {
    pub fn new(
        location: Arc<dyn LocationService>,
        permissions: Arc<dyn PermissionProvider>,
    ) -> Self {
        Self {
            location,
            permissions,
        }
    }
}

#[async_trait]
impl CapabilityHandler for LocationHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        if !self.permissions.is_granted(Permission::Location).await {
            return Err(HandlerError::PermissionDenied(
                "Location permission not granted".to_string(),
            ));
        }

        let fix = self
            .location
            .last_known_location()
            .await
            .map_err(|e| HandlerError::internal(format!("Location service failed: {}", e)))?;

        let Some(fix) = fix else {
            debug!("No last known location");
            return Ok(Value::from(LOCATION_UNAVAILABLE));
        };

        if !fix.is_valid() {
            return Err(HandlerError::internal(
                "Location service returned out-of-range coordinates",
            ));
        }

        Ok(Value::Text(format!(
            "Lat: {}, Lng: {}",
            fix.latitude, fix.longitude
        )))
    }
}

use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::PowerSource;
use std::sync::Arc;
use tracing::debug;

/// `batteryLevel`: charge percentage in `0..=100`.
///
/// Negative readings mean the platform is not tracking the battery and are
/// reported as `InternalError`; overshoot above 100 is clamped.
pub struct BatteryLevelHandler {
    power: Arc<dyn PowerSource>,
}

impl BatteryLevelHandler {
    pub fn new(power: Arc<dyn PowerSource>) -> Self {
        Self { power }
    }
}

#[async_trait]
impl CapabilityHandler for BatteryLevelHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        let raw = self
            .power
            .battery_percentage()
            .await
            .map_err(|e| HandlerError::internal(format!("Battery service unavailable: {}", e)))?;

        if raw < 0 {
            return Err(HandlerError::internal(format!(
                "Battery level unavailable (platform reported {})",
                raw
            )));
        }

        if raw > 100 {
            debug!(raw, "Clamping battery reading");
        }

        Ok(Value::Integer(raw.min(100)))
    }
}

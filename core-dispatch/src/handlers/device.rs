use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::DeviceInfo;
use std::sync::Arc;

/// `platformVersion`: platform name and version, e.g. `"Android 14"`.
pub struct PlatformVersionHandler {
    device: Arc<dyn DeviceInfo>,
}

impl PlatformVersionHandler {
    pub fn new(device: Arc<dyn DeviceInfo>) -> Self {
        Self { device }
    }
}

#[async_trait]
impl CapabilityHandler for PlatformVersionHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        let version = self
            .device
            .platform_version()
            .await
            .map_err(|e| HandlerError::internal(format!("Platform version unavailable: {}", e)))?;
        Ok(Value::Text(version))
    }
}

/// `deviceModel`: hardware model name.
pub struct DeviceModelHandler {
    device: Arc<dyn DeviceInfo>,
}

impl DeviceModelHandler {
    pub fn new(device: Arc<dyn DeviceInfo>) -> Self {
        Self { device }
    }
}

#[async_trait]
impl CapabilityHandler for DeviceModelHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        let model = self
            .device
            .device_model()
            .await
            .map_err(|e| HandlerError::internal(format!("Device model unavailable: {}", e)))?;
        Ok(Value::Text(model))
    }
}

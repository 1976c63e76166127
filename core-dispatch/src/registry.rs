//! Command to handler routing table.

use crate::command::Command;
use crate::error::RegistryError;
use crate::handler::CapabilityHandler;
use crate::handlers::{
    BatteryLevelHandler, DeviceModelHandler, FreeStorageHandler, LocationHandler,
    PlatformVersionHandler, ShowAlertHandler, TakeScreenshotHandler,
};
use core_runtime::config::BridgeConfig;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Maps each [`Command`] to at most one handler.
///
/// Built once during initialization, then frozen behind an `Arc` and shared
/// read-only by the dispatcher: there is no API to add or remove handlers
/// through a shared reference.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Command, Arc<dyn CapabilityHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all seven handlers wired to the configured collaborators.
    pub fn from_config(config: &BridgeConfig) -> Self {
        let mut handlers: HashMap<Command, Arc<dyn CapabilityHandler>> = HashMap::new();

        handlers.insert(
            Command::PlatformVersion,
            Arc::new(PlatformVersionHandler::new(Arc::clone(&config.device_info))),
        );
        handlers.insert(
            Command::DeviceModel,
            Arc::new(DeviceModelHandler::new(Arc::clone(&config.device_info))),
        );
        handlers.insert(
            Command::BatteryLevel,
            Arc::new(BatteryLevelHandler::new(Arc::clone(&config.power_source))),
        );
        handlers.insert(
            Command::FreeStorage,
            Arc::new(FreeStorageHandler::new(Arc::clone(&config.storage_info))),
        );
        handlers.insert(
            Command::Location,
            Arc::new(LocationHandler::new(
                Arc::clone(&config.location_service),
                Arc::clone(&config.permissions),
            )),
        );
        handlers.insert(
            Command::ShowAlert,
            Arc::new(ShowAlertHandler::new(
                config.alert_title.clone(),
                Arc::clone(&config.alert_presenter),
                Arc::clone(&config.ui_executor),
            )),
        );
        handlers.insert(
            Command::TakeScreenshot,
            Arc::new(
                TakeScreenshotHandler::new(
                    Arc::clone(&config.screen_capture),
                    Arc::clone(&config.ui_executor),
                    Arc::clone(&config.permissions),
                    Arc::clone(&config.clock),
                    config.screenshot_dir.clone(),
                )
                .require_storage_permission(config.require_storage_permission),
            ),
        );

        debug!(handlers = handlers.len(), "Handler registry built");
        Self { handlers }
    }

    /// Register `handler` for `command`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateCommand`] if the command already has a
    /// handler; the existing one is kept.
    pub fn register(
        &mut self,
        command: Command,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&command) {
            return Err(RegistryError::DuplicateCommand(command));
        }
        self.handlers.insert(command, handler);
        Ok(())
    }

    /// Look up the handler for a wire name.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownCommand`] for a name outside the command set
    /// - [`RegistryError::NotImplemented`] for a known command with no handler
    pub fn resolve(
        &self,
        name: &str,
    ) -> Result<(Command, Arc<dyn CapabilityHandler>), RegistryError> {
        let command = Command::from_name(name)
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))?;

        self.handlers
            .get(&command)
            .map(|handler| (command, Arc::clone(handler)))
            .ok_or_else(|| RegistryError::NotImplemented {
                command,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, command: Command) -> bool {
        self.handlers.contains_key(&command)
    }

    /// Registered commands in declaration order.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = self.handlers.keys().copied().collect();
        commands.sort();
        commands
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("commands", &self.commands())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Arguments;
    use crate::outcome::Value;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl CapabilityHandler for Echo {
        async fn invoke(&self, _arguments: &Arguments) -> crate::error::Result<Value> {
            Ok(Value::from(self.0))
        }
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(Command::DeviceModel, Arc::new(Echo("first")))
            .unwrap();

        let err = registry
            .register(Command::DeviceModel, Arc::new(Echo("second")))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCommand(Command::DeviceModel));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_by_alias() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(Command::BatteryLevel, Arc::new(Echo("battery")))
            .unwrap();

        let (command, handler) = registry.resolve("getBatteryLevel").unwrap();
        assert_eq!(command, Command::BatteryLevel);
        assert_eq!(
            handler.invoke(&Arguments::new()).await.unwrap(),
            Value::from("battery")
        );
    }

    #[test]
    fn test_unknown_vs_not_implemented() {
        let registry = HandlerRegistry::new();

        assert!(matches!(
            registry.resolve("flyToMoon"),
            Err(RegistryError::UnknownCommand(name)) if name == "flyToMoon"
        ));
        assert!(matches!(
            registry.resolve("getLocation"),
            Err(RegistryError::NotImplemented { command: Command::Location, name })
                if name == "getLocation"
        ));
    }

    #[test]
    fn test_commands_are_sorted() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(Command::TakeScreenshot, Arc::new(Echo("")))
            .unwrap();
        registry
            .register(Command::PlatformVersion, Arc::new(Echo("")))
            .unwrap();

        assert_eq!(
            registry.commands(),
            vec![Command::PlatformVersion, Command::TakeScreenshot]
        );
    }
}

use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::{run_on_ui, Alert, AlertPresenter, UiExecutor};
use std::sync::Arc;

/// Shown when the caller supplies no usable message.
pub const DEFAULT_ALERT_MESSAGE: &str = "Default Message";

/// `showAlert`: presents a native alert with a single OK action.
///
/// The message comes from the `message` argument when it is a string. If
/// `message` is absent, a bare string argument is used instead. Anything else
/// falls back to [`DEFAULT_ALERT_MESSAGE`]. Succeeds with `Null` once the
/// alert is on screen.
pub struct ShowAlertHandler {
    title: String,
    presenter: Arc<dyn AlertPresenter>,
    ui: Arc<dyn UiExecutor>,
}

impl ShowAlertHandler {
    pub fn new(
        title: impl Into<String>,
        presenter: Arc<dyn AlertPresenter>,
        ui: Arc<dyn UiExecutor>,
    ) -> Self {
        Self {
            title: title.into(),
            presenter,
            ui,
        }
    }
}

fn alert_message(arguments: &Arguments) -> &str {
    if arguments.contains("message") {
        return arguments
            .get_str("message")
            .unwrap_or(DEFAULT_ALERT_MESSAGE);
    }

    arguments
        .positional()
        .and_then(serde_json::Value::as_str)
        .unwrap_or(DEFAULT_ALERT_MESSAGE)
}

#[async_trait]
impl CapabilityHandler for ShowAlertHandler {
    async fn invoke(&self, arguments: &Arguments) -> Result<Value> {
        let alert = Alert::new(self.title.clone(), alert_message(arguments));
        let presenter = Arc::clone(&self.presenter);

        run_on_ui(self.ui.as_ref(), move || presenter.present(&alert))
            .await
            .map_err(|e| HandlerError::internal(format!("Could not reach UI thread: {}", e)))?
            .map_err(|e| HandlerError::internal(format!("Failed to present alert: {}", e)))?;

        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_argument() {
        let args = Arguments::from_json(json!({"message": "Hello"}));
        assert_eq!(alert_message(&args), "Hello");
    }

    #[test]
    fn test_missing_message_defaults() {
        assert_eq!(alert_message(&Arguments::new()), DEFAULT_ALERT_MESSAGE);
    }

    #[test]
    fn test_non_string_message_defaults() {
        let args = Arguments::from_json(json!({"message": 42}));
        assert_eq!(alert_message(&args), DEFAULT_ALERT_MESSAGE);
    }

    #[test]
    fn test_positional_message() {
        let args = Arguments::from_json(json!("Bare text"));
        assert_eq!(alert_message(&args), "Bare text");
    }

    #[test]
    fn test_named_message_wins_over_positional() {
        let args = Arguments::new()
            .with("message", json!(null))
            .with_positional("ignored");
        assert_eq!(alert_message(&args), DEFAULT_ALERT_MESSAGE);
    }
}

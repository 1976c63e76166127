//! UI thread and alert presentation for desktop hosts.

use bridge_traits::{
    error::{BridgeError, Result},
    ui::{Alert, AlertPresenter, UiExecutor, UiJob},
};
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

const UI_THREAD_NAME: &str = "bridge-ui";

/// A dedicated OS thread standing in for the UI thread.
///
/// Jobs run one at a time in posting order. A panicking job is logged and
/// dropped; the thread keeps serving later jobs. The thread exits once the
/// executor is dropped and the queue has drained.
pub struct DedicatedUiThread {
    sender: Mutex<Option<Sender<UiJob>>>,
    handle: Option<JoinHandle<()>>,
}

impl DedicatedUiThread {
    pub fn spawn() -> Result<Self> {
        Self::spawn_named(UI_THREAD_NAME)
    }

    pub fn spawn_named(name: &str) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<UiJob>();

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in receiver {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                        error!(panic = %panic_message(&*payload), "UI job panicked");
                    }
                }
                debug!("UI thread queue closed");
            })?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            handle: Some(handle),
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl UiExecutor for DedicatedUiThread {
    fn post(&self, job: UiJob) -> Result<()> {
        let guard = self
            .sender
            .lock()
            .map_err(|_| BridgeError::UiUnavailable("UI queue lock poisoned".to_string()))?;

        guard
            .as_ref()
            .ok_or_else(|| BridgeError::UiUnavailable("UI thread stopped".to_string()))?
            .send(job)
            .map_err(|_| BridgeError::UiUnavailable("UI thread stopped".to_string()))
    }
}

impl Drop for DedicatedUiThread {
    fn drop(&mut self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        if let Some(handle) = self.handle.take() {
            // Joining from the UI thread itself would deadlock.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

/// Prints alerts to stderr. Used when no windowing system is available.
#[derive(Debug, Clone, Default)]
pub struct TerminalAlertPresenter;

impl AlertPresenter for TerminalAlertPresenter {
    fn present(&self, alert: &Alert) -> Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "┌─ {}", alert.title)?;
        writeln!(stderr, "│ {}", alert.message)?;
        writeln!(stderr, "└─ [{}]", alert.dismiss_label)?;
        Ok(())
    }
}

/// Native message box through `rfd`.
///
/// `present` is called on the UI thread and shows the dialog right there,
/// returning once the user dismisses it.
#[cfg(feature = "native-dialogs")]
#[derive(Debug, Clone)]
pub struct DialogAlertPresenter {
    show: fn(&Alert),
}

#[cfg(feature = "native-dialogs")]
impl Default for DialogAlertPresenter {
    fn default() -> Self {
        Self {
            show: show_message_dialog,
        }
    }
}

#[cfg(feature = "native-dialogs")]
fn show_message_dialog(alert: &Alert) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(alert.title.as_str())
        .set_description(alert.message.as_str())
        .set_buttons(rfd::MessageButtons::OkCustom(alert.dismiss_label.clone()))
        .show();
}

#[cfg(feature = "native-dialogs")]
impl AlertPresenter for DialogAlertPresenter {
    fn present(&self, alert: &Alert) -> Result<()> {
        debug!(title = %alert.title, "Showing message dialog");
        (self.show)(alert);
        Ok(())
    }
}

/// The best presenter compiled into this build.
pub fn default_alert_presenter() -> Arc<dyn AlertPresenter> {
    #[cfg(feature = "native-dialogs")]
    return Arc::new(DialogAlertPresenter::default());

    #[cfg(not(feature = "native-dialogs"))]
    return Arc::new(TerminalAlertPresenter);
}

//! UI Thread Abstractions
//!
//! Some platform work may only run on the thread that owns the UI toolkit:
//! presenting an alert, reading back the rendered window. Handlers hop onto
//! that thread through a [`UiExecutor`] and await the result with
//! [`run_on_ui`], so the caller of the handler never sees the hop.

use futures::channel::oneshot;

use crate::error::{BridgeError, Result};

/// A unit of work to run on the UI-owning thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Executor that owns the UI thread.
///
/// - **Android**: `Handler(Looper.getMainLooper()).post`
/// - **iOS**: `DispatchQueue.main.async`
/// - **Desktop**: a dedicated thread draining a job queue
///
/// `post` must not block: it only enqueues the job. Jobs run in the order
/// they were posted.
pub trait UiExecutor: Send + Sync {
    /// Enqueue `job` for execution on the UI thread.
    fn post(&self, job: UiJob) -> Result<()>;
}

/// Run `f` on the UI thread and await its return value.
///
/// # Errors
///
/// - Any error returned by [`UiExecutor::post`]
/// - [`BridgeError::UiUnavailable`] if the job was dropped without running
///   to completion (the UI thread shut down, or `f` panicked)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::ui::run_on_ui;
///
/// let frame = run_on_ui(executor.as_ref(), move || capture.capture()).await??;
/// ```
pub async fn run_on_ui<T, F>(executor: &dyn UiExecutor, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    executor.post(Box::new(move || {
        // The receiver may have gone away; nothing to report to in that case.
        let _ = tx.send(f());
    }))?;

    rx.await.map_err(|_| {
        BridgeError::UiUnavailable("UI job was dropped before it completed".to_string())
    })
}

/// A native alert dialog with a single dismiss action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub dismiss_label: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            dismiss_label: "OK".to_string(),
        }
    }
}

/// Alert presenter trait
///
/// Called on the UI thread, and must show the alert from that thread.
/// Implementations return once the alert is up; a modal toolkit dialog
/// returns on dismissal instead.
pub trait AlertPresenter: Send + Sync {
    fn present(&self, alert: &Alert) -> Result<()>;
}

//! # Event Bus System
//!
//! Broadcasts invocation lifecycle events using `tokio::sync::broadcast`, so a
//! host can observe what the bridge is doing (for diagnostics overlays, audit
//! logs or tests) without sitting on the reply path.
//!
//! ## Overview
//!
//! - **BridgeEvent**: one variant per lifecycle step of an invocation
//! - **EventBus**: central broadcast channel; cheap to clone
//! - **EventStream**: receiver wrapper with optional filtering
//!
//! ```text
//! ┌────────────┐     emit      ┌───────────┐    subscribe    ┌────────────┐
//! │ Dispatcher ├──────────────>│ EventBus  ├────────────────>│ Subscriber │
//! └────────────┘               └───────────┘                 └────────────┘
//! ```
//!
//! Emitting never blocks and never fails the invocation: with no subscriber
//! the event is simply discarded.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{BridgeEvent, EventBus, EventStream};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::default();
//! let mut failures = EventStream::new(bus.subscribe()).filter(|event| !event.is_success());
//!
//! bus.emit(BridgeEvent::InvocationRejected {
//!     command: "flyToMoon".to_string(),
//!     kind: "UnknownCommand".to_string(),
//! })
//! .ok();
//!
//! let event = failures.recv().await.unwrap();
//! assert_eq!(event.command(), "flyToMoon");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Non-fatal; keep receiving.
//! - **`RecvError::Closed`**: every bus handle was dropped. Treat as shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Lifecycle event of a single invocation.
///
/// `kind` fields carry the failure kind name exactly as it appears on the
/// wire (`"PermissionDenied"`, `"InternalError"`, ...). Event payloads never
/// carry argument values or results, only command names and outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BridgeEvent {
    /// A handler was resolved and its task spawned.
    InvocationStarted { request_id: String, command: String },
    /// The handler finished. Published just before the outcome is handed to
    /// the caller, so anyone holding the outcome can already see this event.
    InvocationCompleted {
        request_id: String,
        command: String,
        ok: bool,
        kind: Option<String>,
        elapsed_ms: u64,
    },
    /// The command never reached a handler (unknown or not implemented).
    InvocationRejected { command: String, kind: String },
}

/// Coarse severity used by hosts to decide how loudly to surface an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl BridgeEvent {
    /// Name of the command this event is about, as the caller sent it.
    pub fn command(&self) -> &str {
        match self {
            BridgeEvent::InvocationStarted { command, .. }
            | BridgeEvent::InvocationCompleted { command, .. }
            | BridgeEvent::InvocationRejected { command, .. } => command,
        }
    }

    /// Request id, absent for rejected invocations which never got one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            BridgeEvent::InvocationStarted { request_id, .. }
            | BridgeEvent::InvocationCompleted { request_id, .. } => Some(request_id),
            BridgeEvent::InvocationRejected { .. } => None,
        }
    }

    /// `false` for rejected invocations and failed completions.
    pub fn is_success(&self) -> bool {
        match self {
            BridgeEvent::InvocationStarted { .. } => true,
            BridgeEvent::InvocationCompleted { ok, .. } => *ok,
            BridgeEvent::InvocationRejected { .. } => false,
        }
    }

    pub fn description(&self) -> String {
        match self {
            BridgeEvent::InvocationStarted { command, .. } => {
                format!("Invocation of '{}' started", command)
            }
            BridgeEvent::InvocationCompleted {
                command,
                ok: true,
                elapsed_ms,
                ..
            } => format!("Invocation of '{}' succeeded in {} ms", command, elapsed_ms),
            BridgeEvent::InvocationCompleted {
                command,
                kind,
                elapsed_ms,
                ..
            } => format!(
                "Invocation of '{}' failed with {} after {} ms",
                command,
                kind.as_deref().unwrap_or("unknown error"),
                elapsed_ms
            ),
            BridgeEvent::InvocationRejected { command, kind } => {
                format!("Invocation of '{}' rejected: {}", command, kind)
            }
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            BridgeEvent::InvocationStarted { .. } => EventSeverity::Debug,
            BridgeEvent::InvocationCompleted { ok: true, .. } => EventSeverity::Info,
            BridgeEvent::InvocationCompleted { kind, .. } => match kind.as_deref() {
                Some("InternalError") => EventSeverity::Error,
                _ => EventSeverity::Warning,
            },
            BridgeEvent::InvocationRejected { .. } => EventSeverity::Warning,
        }
    }
}

impl fmt::Display for BridgeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Central broadcast channel for [`BridgeEvent`]s.
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// `capacity` is the number of events buffered per subscriber before the
    /// slowest one starts receiving `RecvError::Lagged`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0; `BridgeConfig::validate` rejects that value.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of receivers, or an error if there are none.
    pub fn emit(&self, event: BridgeEvent) -> Result<usize, SendError<BridgeEvent>> {
        self.sender.send(event)
    }

    /// Subscribe to future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&BridgeEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` that can skip events not matching a predicate.
pub struct EventStream {
    receiver: Receiver<BridgeEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<BridgeEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events for which `predicate` returns `true` are yielded.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&BridgeEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &BridgeEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receive the next matching event.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once every sender is gone.
    pub async fn recv(&mut self) -> Result<BridgeEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv); `None` when nothing is queued.
    pub fn try_recv(&mut self) -> Option<Result<BridgeEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.accepts(&event) => return Some(Ok(event)),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

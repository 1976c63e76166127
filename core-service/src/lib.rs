//! Capability bridge façade and bootstrap helpers.
//!
//! This crate wires host-provided platform collaborators into a
//! [`HandlerRegistry`] and [`Dispatcher`] and exposes one handle,
//! [`BridgeService`], to the host UI layer. Desktop apps typically enable the
//! `desktop-shims` feature (which fills every missing collaborator from
//! `bridge-desktop`); mobile hosts inject their own adapters through
//! [`BridgeConfig::builder`].
//!
//! Hosts that talk over a byte channel can use [`BridgeService::handle_json`],
//! which takes one invocation message and returns one response message.

pub mod error;

pub use error::{Result, ServiceError};

pub use core_dispatch::{
    Arguments, Command, Completion, FailureKind, Invocation, Outcome, PendingOutcome, RequestId,
    ResultReceiver, Value,
};
pub use core_runtime::config::BridgeConfig;
#[cfg(feature = "desktop-shims")]
pub use core_runtime::config::DesktopOptions;
pub use core_runtime::events::{BridgeEvent, EventStream};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

use core_dispatch::{
    result_channel, Dispatcher, Failure, HandlerRegistry, InvocationMessage, ResponseMessage,
    ResultSender,
};
use core_runtime::events::EventBus;
use tracing::{info, warn};

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the registry, the event bus and the result
/// channel. The result receiver can be taken once, by whichever clone asks
/// first.
pub struct BridgeService {
    dispatcher: Dispatcher,
    events: EventBus,
    results: ResultSender,
    receiver: Option<ResultReceiver>,
}

impl BridgeService {
    /// Build the service from a validated configuration.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        config.validate()?;

        let registry = HandlerRegistry::from_config(&config);
        let events = EventBus::new(config.event_buffer_size);
        let dispatcher = Dispatcher::new(registry).with_events(events.clone());
        let (results, receiver) = result_channel();

        info!(
            commands = dispatcher.registry().len(),
            screenshot_dir = %config.screenshot_dir.display(),
            "Bridge service ready"
        );

        Ok(Self {
            dispatcher,
            events,
            results,
            receiver: Some(receiver),
        })
    }

    /// Commands with a registered handler, in declaration order.
    pub fn commands(&self) -> Vec<Command> {
        self.dispatcher.registry().commands()
    }

    /// Start an invocation and get a future for its outcome.
    pub fn dispatch(&self, invocation: Invocation) -> PendingOutcome {
        self.dispatcher.dispatch(invocation)
    }

    /// Dispatch and wait for the outcome.
    pub async fn call(&self, invocation: Invocation) -> Outcome {
        self.dispatcher.call(invocation).await
    }

    /// Start an invocation whose outcome arrives on the service's result
    /// channel, tagged with the returned id.
    pub fn submit(&self, invocation: Invocation) -> RequestId {
        self.dispatcher.submit(invocation, &self.results)
    }

    /// Take the receiving end of the result channel.
    ///
    /// Returns `None` after the first call. Completions submitted before the
    /// receiver is taken are queued, not lost.
    pub fn take_results(&mut self) -> Option<ResultReceiver> {
        self.receiver.take()
    }

    /// Observe invocation lifecycle events from now on.
    pub fn subscribe_events(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Run one JSON invocation message and render its JSON response.
    ///
    /// A line that is not a valid invocation message is answered with an
    /// `InternalError` response rather than an error.
    pub async fn handle_json(&self, line: &str) -> String {
        let response = match parse_invocation(line) {
            Ok(invocation) => ResponseMessage::from(self.call(invocation).await),
            Err(err) => {
                warn!(error = %err, "Rejected malformed invocation message");
                ResponseMessage::from(Outcome::Failure(Failure::internal(err.to_string())))
            }
        };
        render_response(&response)
    }
}

impl Clone for BridgeService {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            events: self.events.clone(),
            results: self.results.clone(),
            receiver: None,
        }
    }
}

impl std::fmt::Debug for BridgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeService")
            .field("dispatcher", &self.dispatcher)
            .field("results_taken", &self.receiver.is_none())
            .finish()
    }
}

/// Parse one wire invocation message.
pub fn parse_invocation(line: &str) -> Result<Invocation> {
    let message: InvocationMessage = serde_json::from_str(line.trim())?;
    Ok(message.into_invocation())
}

/// Render an outcome as one wire response message.
pub fn render_outcome(outcome: Outcome) -> String {
    render_response(&ResponseMessage::from(outcome))
}

fn render_response(response: &ResponseMessage) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        format!(
            r#"{{"ok":false,"kind":"InternalError","message":"Failed to encode response: {}"}}"#,
            err.to_string().replace('"', "'")
        )
    })
}

/// Convenience bootstrapper for desktop hosts: every collaborator comes from
/// `bridge-desktop`, configured by `options`.
///
/// ```no_run
/// # #[cfg(feature = "desktop-shims")]
/// # async fn example() -> core_service::Result<()> {
/// use core_service::{bootstrap_desktop, DesktopOptions, Invocation};
///
/// let service = bootstrap_desktop(DesktopOptions::default())?;
/// let outcome = service.call(Invocation::bare("batteryLevel")).await;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(options: DesktopOptions) -> Result<BridgeService> {
    let config = BridgeConfig::builder().desktop_options(options).build()?;
    BridgeService::new(config)
}

//! Asynchronous invocation routing.

use crate::arguments::Arguments;
use crate::channel::{PendingOutcome, RequestId, Responder, ResultSender};
use crate::command::Command;
use crate::handler::CapabilityHandler;
use crate::outcome::{Failure, Outcome};
use crate::registry::HandlerRegistry;
use core_runtime::events::{BridgeEvent, EventBus};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{debug, error, info_span, warn, Instrument};

/// A request to run one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Wire name, canonical or alias. Resolved by the registry.
    pub command: String,
    pub arguments: Arguments,
}

impl Invocation {
    pub fn new(command: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            command: command.into(),
            arguments,
        }
    }

    /// Invocation without arguments.
    pub fn bare(command: impl Into<String>) -> Self {
        Self::new(command, Arguments::new())
    }
}

impl From<Command> for Invocation {
    fn from(command: Command) -> Self {
        Self::bare(command.as_str())
    }
}

/// Routes invocations to their handlers.
///
/// `dispatch` and `submit` return immediately. Each resolved invocation runs
/// as its own task on the current Tokio runtime, so a slow handler never
/// delays another invocation. Every invocation is answered exactly once:
/// - unresolvable names are answered inline, without spawning
/// - handler errors become `PermissionDenied` or `InternalError`
/// - a panicking handler becomes `InternalError`
///
/// No ordering is guaranteed between completions of different invocations.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    events: Option<EventBus>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            events: None,
        }
    }

    /// Publish lifecycle events for every invocation on `bus`.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Start an invocation and get a future for its outcome.
    ///
    /// The handler starts running even if the returned future is never
    /// polled.
    pub fn dispatch(&self, invocation: Invocation) -> PendingOutcome {
        let (responder, pending) = PendingOutcome::channel();
        self.route(RequestId::new(), invocation, responder);
        pending
    }

    /// Start an invocation whose outcome is delivered on `results`, tagged
    /// with the returned id.
    pub fn submit(&self, invocation: Invocation, results: &ResultSender) -> RequestId {
        let request_id = RequestId::new();
        let responder = results.responder(request_id, invocation.command.clone());
        self.route(request_id, invocation, responder);
        request_id
    }

    /// Dispatch and wait for the outcome.
    pub async fn call(&self, invocation: Invocation) -> Outcome {
        self.dispatch(invocation).await
    }

    fn route(&self, request_id: RequestId, invocation: Invocation, responder: Responder) {
        let (command, handler) = match self.registry.resolve(&invocation.command) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(
                    command = %invocation.command,
                    kind = %err.kind(),
                    "Invocation rejected"
                );
                self.emit(BridgeEvent::InvocationRejected {
                    command: invocation.command,
                    kind: err.kind().to_string(),
                });
                responder.respond(Outcome::Failure(err.into()));
                return;
            }
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                error!(%command, "Dispatch called outside a Tokio runtime");
                responder.respond(Outcome::Failure(Failure::internal(
                    "No async runtime available to run the handler",
                )));
                return;
            }
        };

        self.emit(BridgeEvent::InvocationStarted {
            request_id: request_id.to_string(),
            command: invocation.command.clone(),
        });

        let span = info_span!("invocation", %request_id, %command);
        let events = self.events.clone();

        runtime.spawn(
            async move {
                debug!("Invocation started");
                let started = Instant::now();
                let outcome = run_handler(handler.as_ref(), &invocation.arguments).await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                if let Some(bus) = events {
                    let _ = bus.emit(BridgeEvent::InvocationCompleted {
                        request_id: request_id.to_string(),
                        command: invocation.command,
                        ok: outcome.is_success(),
                        kind: outcome.failure_kind().map(|kind| kind.to_string()),
                        elapsed_ms,
                    });
                }

                responder.respond(outcome);
            }
            .instrument(span),
        );
    }

    fn emit(&self, event: BridgeEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is fine.
            let _ = bus.emit(event);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("events", &self.events)
            .finish()
    }
}

/// Run a handler to completion, turning errors and panics into outcomes.
async fn run_handler(handler: &dyn CapabilityHandler, arguments: &Arguments) -> Outcome {
    match AssertUnwindSafe(handler.invoke(arguments))
        .catch_unwind()
        .await
    {
        Ok(Ok(value)) => {
            debug!("Handler succeeded");
            Outcome::Success(value)
        }
        Ok(Err(err)) => {
            warn!(kind = %err.kind(), error = %err, "Handler failed");
            Outcome::Failure(err.into())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(panic = %message, "Handler panicked");
            Outcome::Failure(Failure::internal(format!("Handler panicked: {}", message)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::outcome::{FailureKind, Value};
    use async_trait::async_trait;

    struct Fixed(Result<Value, HandlerError>);

    #[async_trait]
    impl CapabilityHandler for Fixed {
        async fn invoke(&self, _arguments: &Arguments) -> crate::error::Result<Value> {
            self.0.clone()
        }
    }

    struct Panics;

    #[async_trait]
    impl CapabilityHandler for Panics {
        async fn invoke(&self, _arguments: &Arguments) -> crate::error::Result<Value> {
            panic!("sensor exploded")
        }
    }

    fn dispatcher_with(command: Command, handler: Arc<dyn CapabilityHandler>) -> Dispatcher {
        let mut registry = HandlerRegistry::new();
        registry.register(command, handler).unwrap();
        Dispatcher::new(registry)
    }

    #[tokio::test]
    async fn test_success_is_delivered() {
        let dispatcher = dispatcher_with(
            Command::DeviceModel,
            Arc::new(Fixed(Ok(Value::from("Pixel 8")))),
        );

        let outcome = dispatcher.call(Invocation::bare("deviceModel")).await;
        assert_eq!(outcome, Outcome::success("Pixel 8"));
    }

    #[tokio::test]
    async fn test_handler_error_kind_is_preserved() {
        let dispatcher = dispatcher_with(
            Command::Location,
            Arc::new(Fixed(Err(HandlerError::PermissionDenied(
                "Location permission not granted".to_string(),
            )))),
        );

        let outcome = dispatcher.call(Invocation::bare("location")).await;
        assert_eq!(
            outcome,
            Outcome::failure(
                FailureKind::PermissionDenied,
                "Location permission not granted"
            )
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let dispatcher = dispatcher_with(Command::BatteryLevel, Arc::new(Panics));

        let outcome = dispatcher.call(Invocation::bare("batteryLevel")).await;
        match outcome {
            Outcome::Failure(failure) => {
                assert_eq!(failure.kind, FailureKind::InternalError);
                assert!(failure.message.contains("sensor exploded"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_answered_without_runtime() {
        let dispatcher = Dispatcher::new(HandlerRegistry::new());
        let outcome = futures::executor::block_on(dispatcher.dispatch(Invocation::bare("nope")));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::UnknownCommand));
    }

    #[test]
    fn test_resolved_command_without_runtime_is_internal_error() {
        let dispatcher = dispatcher_with(Command::DeviceModel, Arc::new(Fixed(Ok(Value::Null))));
        let outcome =
            futures::executor::block_on(dispatcher.dispatch(Invocation::bare("deviceModel")));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InternalError));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}

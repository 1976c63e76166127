//! Concurrency, exactly-once delivery and lifecycle events.

use async_trait::async_trait;
use core_dispatch::{
    result_channel, Arguments, CapabilityHandler, Command, Dispatcher, FailureKind,
    HandlerRegistry, Invocation, Outcome, Value,
};
use core_runtime::events::{BridgeEvent, EventBus};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Blocks until released, counting how often it ran.
struct Gated {
    gate: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CapabilityHandler for Gated {
    async fn invoke(&self, _arguments: &Arguments) -> core_dispatch::error::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(Value::from("slow"))
    }
}

struct Counting {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CapabilityHandler for Counting {
    async fn invoke(&self, arguments: &Arguments) -> core_dispatch::error::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = arguments.get("n").and_then(|n| n.as_i64()).unwrap_or(-1);
        Ok(Value::from(n))
    }
}

struct Panics;

#[async_trait]
impl CapabilityHandler for Panics {
    async fn invoke(&self, _arguments: &Arguments) -> core_dispatch::error::Result<Value> {
        panic!("capture buffer poisoned")
    }
}

/// Never finishes.
struct Stuck;

#[async_trait]
impl CapabilityHandler for Stuck {
    async fn invoke(&self, _arguments: &Arguments) -> core_dispatch::error::Result<Value> {
        std::future::pending().await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_handler_does_not_block_others() {
    let gate = Arc::new(Notify::new());
    let slow_calls = Arc::new(AtomicUsize::new(0));
    let fast_calls = Arc::new(AtomicUsize::new(0));

    let mut registry = HandlerRegistry::new();
    registry
        .register(
            Command::TakeScreenshot,
            Arc::new(Gated {
                gate: gate.clone(),
                calls: slow_calls.clone(),
            }),
        )
        .unwrap();
    registry
        .register(
            Command::BatteryLevel,
            Arc::new(Counting {
                calls: fast_calls.clone(),
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    let slow = dispatcher.dispatch(Invocation::bare("takeScreenshot"));
    let fast = dispatcher.call(Invocation::new(
        "batteryLevel",
        Arguments::new().with("n", 7),
    ));

    let fast = timeout(Duration::from_secs(5), fast).await.unwrap();
    assert_eq!(fast, Outcome::success(7));

    gate.notify_one();
    let slow = timeout(Duration::from_secs(5), slow).await.unwrap();
    assert_eq!(slow, Outcome::success("slow"));
    assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fast_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_submission_completes_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    registry
        .register(
            Command::BatteryLevel,
            Arc::new(Counting {
                calls: calls.clone(),
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry);
    let (sender, mut receiver) = result_channel();

    let mut submitted = HashSet::new();
    for n in 0..50 {
        let name = if n % 5 == 0 { "bogus" } else { "getBatteryLevel" };
        let id = dispatcher.submit(
            Invocation::new(name, Arguments::new().with("n", n)),
            &sender,
        );
        submitted.insert(id);
    }

    let mut seen = HashSet::new();
    for _ in 0..50 {
        let completion = timeout(Duration::from_secs(5), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(submitted.contains(&completion.request_id));
        assert!(seen.insert(completion.request_id), "delivered twice");

        if completion.command == "bogus" {
            assert_eq!(
                completion.outcome.failure_kind(),
                Some(FailureKind::UnknownCommand)
            );
            assert_eq!(completion.resolved_command(), None);
        } else {
            assert!(completion.outcome.is_success());
            assert_eq!(completion.resolved_command(), Some(Command::BatteryLevel));
        }
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(receiver.try_recv().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 40);
}

#[tokio::test]
async fn panicking_handler_is_isolated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    registry
        .register(Command::TakeScreenshot, Arc::new(Panics))
        .unwrap();
    registry
        .register(
            Command::BatteryLevel,
            Arc::new(Counting {
                calls: calls.clone(),
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    let outcome = dispatcher.call(Invocation::bare("takeScreenshot")).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::InternalError));

    let outcome = dispatcher
        .call(Invocation::new("batteryLevel", Arguments::new().with("n", 3)))
        .await;
    assert_eq!(outcome, Outcome::success(3));
}

#[tokio::test]
async fn lifecycle_events_are_published() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    registry
        .register(Command::BatteryLevel, Arc::new(Counting { calls }))
        .unwrap();

    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let dispatcher = Dispatcher::new(registry).with_events(bus);

    dispatcher.call(Invocation::bare("getBatteryLevel")).await;
    dispatcher.call(Invocation::bare("bogus")).await;

    let started = events.recv().await.unwrap();
    assert!(matches!(started, BridgeEvent::InvocationStarted { .. }));
    assert_eq!(started.command(), "getBatteryLevel");

    match events.recv().await.unwrap() {
        BridgeEvent::InvocationCompleted {
            request_id, ok, kind, ..
        } => {
            assert_eq!(Some(request_id.as_str()), started.request_id());
            assert!(ok);
            assert_eq!(kind, None);
        }
        other => panic!("expected completion, got {:?}", other),
    }

    match events.recv().await.unwrap() {
        BridgeEvent::InvocationRejected { command, kind } => {
            assert_eq!(command, "bogus");
            assert_eq!(kind, "UnknownCommand");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn completion_event_precedes_the_outcome() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    registry
        .register(Command::BatteryLevel, Arc::new(Counting { calls }))
        .unwrap();

    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let dispatcher = Dispatcher::new(registry).with_events(bus);

    let outcome = dispatcher
        .call(Invocation::new("batteryLevel", Arguments::new().with("n", 12)))
        .await;
    assert_eq!(outcome, Outcome::success(12));

    assert!(matches!(
        events.try_recv(),
        Ok(BridgeEvent::InvocationStarted { .. })
    ));
    assert!(matches!(
        events.try_recv(),
        Ok(BridgeEvent::InvocationCompleted { ok: true, .. })
    ));
}

#[test]
fn runtime_shutdown_still_completes_submissions() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Command::TakeScreenshot, Arc::new(Stuck))
        .unwrap();
    let dispatcher = Dispatcher::new(registry);
    let (sender, mut receiver) = result_channel();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let id = runtime.block_on(async {
        let id = dispatcher.submit(Invocation::bare("takeScreenshot"), &sender);
        tokio::task::yield_now().await;
        id
    });
    drop(runtime);

    let completion = receiver.try_recv().unwrap();
    assert_eq!(completion.request_id, id);
    assert_eq!(
        completion.outcome,
        Outcome::failure(FailureKind::InternalError, "Invocation ended without a result")
    );
    assert!(receiver.try_recv().is_none());
}

#[tokio::test]
async fn dropped_receiver_does_not_fail_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();
    registry
        .register(
            Command::BatteryLevel,
            Arc::new(Counting {
                calls: calls.clone(),
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    let (sender, receiver) = result_channel();
    drop(receiver);
    assert!(sender.is_closed());

    dispatcher.submit(Invocation::bare("batteryLevel"), &sender);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

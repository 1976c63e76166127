//! Result delivery.
//!
//! An invocation's outcome travels back through exactly one [`Responder`].
//! The responder is consumed when it replies, so a second reply cannot be
//! expressed; if the responder is dropped without replying, it answers with
//! an `InternalError` itself, on either delivery path.

use crate::command::Command;
use crate::outcome::{Failure, Outcome};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Correlates a submitted invocation with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finished invocation as delivered on the [`ResultReceiver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request_id: RequestId,
    /// The command name exactly as the caller sent it.
    pub command: String,
    pub outcome: Outcome,
}

impl Completion {
    /// The command answered, if the name was a known one.
    pub fn resolved_command(&self) -> Option<Command> {
        Command::from_name(&self.command)
    }
}

const NO_RESULT: &str = "Invocation ended without a result";

/// One-shot reply handle for a single invocation.
///
/// Dropping a responder that never replied answers with `InternalError`, so
/// a handler task torn down mid-flight still yields its one outcome.
#[derive(Debug)]
pub struct Responder {
    target: Option<ReplyTarget>,
}

#[derive(Debug)]
enum ReplyTarget {
    /// Reply to a single awaiting caller.
    Oneshot(oneshot::Sender<Outcome>),
    /// Reply onto a shared result channel, tagged with the request id.
    Channel {
        sender: ResultSender,
        request_id: RequestId,
        command: String,
    },
}

impl ReplyTarget {
    fn deliver(self, outcome: Outcome) {
        match self {
            ReplyTarget::Oneshot(sender) => {
                let _ = sender.send(outcome);
            }
            ReplyTarget::Channel {
                sender,
                request_id,
                command,
            } => sender.deliver(Completion {
                request_id,
                command,
                outcome,
            }),
        }
    }
}

impl Responder {
    /// Deliver the outcome. A receiver that has gone away is not an error.
    pub fn respond(mut self, outcome: Outcome) {
        if let Some(target) = self.target.take() {
            target.deliver(outcome);
        }
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if let Some(target) = self.target.take() {
            tracing::warn!("Responder dropped without a reply");
            target.deliver(Outcome::Failure(Failure::internal(NO_RESULT)));
        }
    }
}

/// Future resolving to the outcome of one dispatched invocation.
#[must_use = "the outcome is lost if the pending result is dropped"]
#[derive(Debug)]
pub struct PendingOutcome {
    receiver: oneshot::Receiver<Outcome>,
}

impl PendingOutcome {
    /// A linked responder/pending pair.
    pub fn channel() -> (Responder, PendingOutcome) {
        let (sender, receiver) = oneshot::channel();
        let responder = Responder {
            target: Some(ReplyTarget::Oneshot(sender)),
        };
        (responder, PendingOutcome { receiver })
    }

    /// Already resolved with `outcome`.
    pub fn ready(outcome: Outcome) -> Self {
        let (responder, pending) = Self::channel();
        responder.respond(outcome);
        pending
    }
}

impl Future for PendingOutcome {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| Outcome::Failure(Failure::internal(NO_RESULT)))
        })
    }
}

/// Shared channel carrying completions back to the host.
///
/// Unbounded so that delivering a result never waits on the host.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ResultSender { sender }, ResultReceiver { receiver })
}

#[derive(Debug, Clone)]
pub struct ResultSender {
    sender: mpsc::UnboundedSender<Completion>,
}

impl ResultSender {
    pub(crate) fn responder(
        &self,
        request_id: RequestId,
        command: impl Into<String>,
    ) -> Responder {
        Responder {
            target: Some(ReplyTarget::Channel {
                sender: self.clone(),
                request_id,
                command: command.into(),
            }),
        }
    }

    fn deliver(&self, completion: Completion) {
        if self.sender.send(completion).is_err() {
            tracing::debug!("Result receiver dropped; discarding completion");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[derive(Debug)]
pub struct ResultReceiver {
    receiver: mpsc::UnboundedReceiver<Completion>,
}

impl ResultReceiver {
    /// Next completion, or `None` once every sender is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<Completion> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Completion> {
        self.receiver.try_recv().ok()
    }
}

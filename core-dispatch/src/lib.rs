//! # Capability Dispatch
//!
//! Routes named capability requests from a host UI layer to native handlers
//! and returns exactly one typed outcome per request.
//!
//! ## Overview
//!
//! - [`HandlerRegistry`]: fixed map from [`Command`] to [`CapabilityHandler`],
//!   built once at startup and read-only afterwards
//! - [`Dispatcher`]: resolves a command name and runs its handler as an
//!   independent task, isolating errors and panics
//! - [`PendingOutcome`] / [`result_channel`]: deliver the [`Outcome`] back,
//!   either to a single awaiting caller or onto a shared channel keyed by
//!   [`RequestId`]
//! - [`handlers`]: the seven built-in capabilities
//!
//! ## Usage
//!
//! ```ignore
//! use core_dispatch::{Dispatcher, HandlerRegistry, Invocation};
//! use core_runtime::config::BridgeConfig;
//!
//! let config = BridgeConfig::builder().build()?;
//! let dispatcher = Dispatcher::new(HandlerRegistry::from_config(&config));
//!
//! let outcome = dispatcher.call(Invocation::bare("getBatteryLevel")).await;
//! ```
//!
//! ## Failure kinds
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `UnknownCommand` | the name is not in the command set |
//! | `NotImplemented` | the command exists but has no handler |
//! | `PermissionDenied` | a required permission is not granted |
//! | `InternalError` | a collaborator failed or the handler panicked |

pub mod arguments;
pub mod channel;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod message;
pub mod outcome;
pub mod registry;

pub use arguments::Arguments;
pub use channel::{
    result_channel, Completion, PendingOutcome, RequestId, Responder, ResultReceiver,
    ResultSender,
};
pub use command::Command;
pub use dispatcher::{Dispatcher, Invocation};
pub use error::{HandlerError, RegistryError};
pub use handler::CapabilityHandler;
pub use message::{InvocationMessage, ResponseMessage};
pub use outcome::{Failure, FailureKind, Outcome, Value};
pub use registry::HandlerRegistry;

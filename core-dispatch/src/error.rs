use crate::command::Command;
use crate::outcome::{Failure, FailureKind};
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors raised while building or querying the handler registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A handler is already registered for '{0}'")]
    DuplicateCommand(Command),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// `name` is the wire name as sent, canonical or alias.
    #[error("No handler registered for '{name}'")]
    NotImplemented { command: Command, name: String },
}

impl RegistryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RegistryError::UnknownCommand(_) => FailureKind::UnknownCommand,
            RegistryError::NotImplemented { .. } => FailureKind::NotImplemented,
            RegistryError::DuplicateCommand(_) => FailureKind::InternalError,
        }
    }
}

/// The failure message is the bare command name, as sent by the caller.
impl From<RegistryError> for Failure {
    fn from(err: RegistryError) -> Self {
        let kind = err.kind();
        let message = match err {
            RegistryError::UnknownCommand(name) => name,
            RegistryError::NotImplemented { name, .. } => name,
            duplicate @ RegistryError::DuplicateCommand(_) => duplicate.to_string(),
        };
        Failure::new(kind, message)
    }
}

/// Errors a capability handler may return.
///
/// Only two kinds can come out of a handler; routing failures are the
/// registry's business.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            HandlerError::PermissionDenied(_) => FailureKind::PermissionDenied,
            HandlerError::Internal(_) => FailureKind::InternalError,
        }
    }
}

impl From<BridgeError> for HandlerError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::PermissionDenied(message) => HandlerError::PermissionDenied(message),
            other => HandlerError::Internal(other.to_string()),
        }
    }
}

impl From<HandlerError> for Failure {
    fn from(err: HandlerError) -> Self {
        Failure::new(err.kind(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;

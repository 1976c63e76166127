use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Bridge initialization failed: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Malformed invocation message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the capability bridge:
//! - Logging and tracing infrastructure
//! - Configuration management and platform defaults
//! - Invocation event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the dispatcher and the service
//! façade depend on. It fixes the logging conventions, gathers the platform
//! collaborators into a validated [`BridgeConfig`](config::BridgeConfig), and
//! broadcasts invocation lifecycle events to observers.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};

//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service` and, through it, `core-runtime` and
//! `bridge-desktop`). Host applications can depend on `capbridge-workspace`
//! and enable the documented features without wiring each crate individually.
//!
//! - `desktop-shims` (default): inject the desktop collaborators for any
//!   capability the host does not provide.
//! - `native-dialogs`: present `showAlert` through the OS message dialog
//!   instead of the terminal presenter.

#[cfg(any(feature = "desktop-shims", feature = "native-dialogs"))]
pub use core_service::*;

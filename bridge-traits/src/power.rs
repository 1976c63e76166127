//! Power state abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Battery/power service.
///
/// Returns the raw platform reading as a percentage. The value is not
/// sanitised here: some platforms report `-1` while battery monitoring is
/// disabled, and others can briefly overshoot 100 while charging. Callers
/// decide how to treat such readings.
///
/// # Errors
///
/// Implementations return [`BridgeError::NotAvailable`](crate::BridgeError::NotAvailable)
/// when the device has no battery or the power service cannot be reached.
#[async_trait]
pub trait PowerSource: Send + Sync {
    /// Current charge level in percent.
    async fn battery_percentage(&self) -> Result<i64>;
}

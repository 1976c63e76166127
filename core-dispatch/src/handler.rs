//! The handler seam.

use crate::arguments::Arguments;
use crate::error::Result;
use crate::outcome::Value;
use async_trait::async_trait;

/// Implementation of one capability command.
///
/// Handlers are stateless between calls apart from the collaborators they
/// hold, and may run concurrently with themselves. A handler that needs the
/// UI thread hops there with [`bridge_traits::run_on_ui`] and awaits the
/// result; the dispatcher never sees the hop.
///
/// Panics are caught by the dispatcher and reported as `InternalError`, but
/// handlers should return [`HandlerError`](crate::error::HandlerError)
/// instead of panicking.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    async fn invoke(&self, arguments: &Arguments) -> Result<Value>;
}

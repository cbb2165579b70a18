//! One-shot de-registration capability for anonymous subscriptions.

use std::fmt;
use std::sync::Arc;

use crate::error::CancelError;
use crate::hub::broadcaster::Registry;

/// Capability to de-register one subscription.
///
/// Bound to exactly one identity at subscribe time. Like any capability
/// value it can be cloned and handed around; whoever invokes it first wins,
/// every later invocation (on any clone) reports
/// [`CancelError::AlreadyDeregistered`] and mutates nothing. There is no
/// double-close: the channel is closed exactly once, atomically with the
/// registry removal.
pub struct CancelHandle<T> {
    registry: Arc<Registry<T>>,
    id: u64,
}

impl<T> CancelHandle<T> {
    pub(crate) fn new(registry: Arc<Registry<T>>, id: u64) -> Self {
        Self { registry, id }
    }

    /// Removes the bound subscription from the registry and closes its
    /// channel.
    ///
    /// Waits out deliveries already in flight to this subscriber (bounded by
    /// the delivery timeout), so the consumer never observes a value sent
    /// after the close.
    pub async fn cancel(&self) -> Result<(), CancelError> {
        self.registry.remove(self.id).await
    }

    /// Identity this handle is bound to (for diagnostics).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Clone for CancelHandle<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            id: self.id,
        }
    }
}

impl<T> fmt::Debug for CancelHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle").field("id", &self.id).finish()
    }
}

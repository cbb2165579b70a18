//! # The subscribe/notify seam.
//!
//! `Observable` is the narrow contract the consumption helper is written
//! against: something that can hand out a fresh subscription and fan a value
//! out to every live subscriber. [`Broadcaster`](crate::Broadcaster)
//! implements it; higher-level components should depend on this trait rather
//! than the concrete registry so they can be driven by anything that
//! broadcasts.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::hub::cancel::CancelHandle;

/// Contract for a source of broadcast values.
#[async_trait]
pub trait Observable<T: Send + 'static>: Send + Sync {
    /// Registers a new subscriber and returns the receive side of its
    /// channel plus the capability to de-register it.
    async fn subscribe(&self) -> (mpsc::Receiver<T>, CancelHandle<T>);

    /// Broadcasts `value` to every currently registered subscriber.
    async fn notify_all(&self, value: T);
}

//! # Anonymous broadcaster: timed fan-out over per-subscriber channels.
//!
//! [`Broadcaster`] keeps a registry of subscriber slots keyed by an
//! auto-assigned monotonic identity. Each subscriber owns the receive side
//! of a dedicated channel; the registry owns the only send side.
//!
//! ## Rules
//! - **Non-blocking publish**: `notify_all()` snapshots the registry and
//!   spawns one detached delivery task per subscriber, then returns.
//! - **Best-effort delivery**: each attempt races a timer; on timeout that
//!   one delivery is dropped with no retry and no backpressure signal.
//! - **No send-after-close**: a delivery holds its slot's read lock across
//!   the send, and the closing step takes the same lock exclusively, so a
//!   channel is closed only when no send is in flight.
//! - **Identity is never reused**: the counter only grows; a cancelled
//!   identity stays dead.
//!
//! ## Locking
//! ```text
//! registry RwLock<HashMap<id, Arc<Slot>>>   held briefly: insert/remove/snapshot
//!     └── Slot RwLock<Option<Sender<T>>>    read: one delivery attempt
//!                                           write: the closing step (cancel)
//! ```
//! The map lock is never held across a send, so registration never waits
//! behind a stalled consumer; a cancel waits only for in-flight deliveries
//! to *its own* subscriber, bounded by the delivery timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{CancelError, CloseError};
use crate::hub::cancel::CancelHandle;
use crate::hub::observable::Observable;

/// One registered subscriber.
///
/// The sender lives behind its own lock so that closing the channel excludes
/// exactly the deliveries to this subscriber, nothing else. `None` means the
/// closing step already ran; a delivery that finds `None` lost the race to a
/// cancel and drops its value.
struct Slot<T> {
    sender: RwLock<Option<mpsc::Sender<T>>>,
}

/// Shared registry state behind every `Broadcaster` clone and
/// [`CancelHandle`].
pub(crate) struct Registry<T> {
    clients: RwLock<HashMap<u64, Arc<Slot<T>>>>,
    next_id: AtomicU64,
    config: Config,
}

impl<T> Registry<T> {
    /// Removes the subscription and closes its channel, as one unit.
    ///
    /// Waits out in-flight deliveries to this subscriber (slot write lock),
    /// then drops the only sender, which closes the stream for the consumer.
    pub(crate) async fn remove(&self, id: u64) -> Result<(), CancelError> {
        let slot = {
            let mut clients = self.clients.write().await;
            match clients.remove(&id) {
                Some(slot) => slot,
                None => return Err(CancelError::AlreadyDeregistered),
            }
        };
        slot.sender.write().await.take();
        trace!(id, "subscription cancelled");
        Ok(())
    }
}

impl<T: Clone + Send + 'static> Registry<T> {
    /// Attempts one delivery to one subscriber.
    ///
    /// The slot read lock is held across the send so the closing step cannot
    /// run mid-delivery. Losing either race (subscriber gone, timeout) drops
    /// the value silently.
    async fn deliver(&self, id: u64, value: T) {
        let slot = {
            let clients = self.clients.read().await;
            match clients.get(&id) {
                Some(slot) => Arc::clone(slot),
                None => {
                    trace!(id, "subscriber de-registered before delivery");
                    return;
                }
            }
        };

        let sender = slot.sender.read().await;
        let Some(tx) = sender.as_ref() else {
            trace!(id, "subscriber closed before delivery");
            return;
        };
        match tx.send_timeout(value, self.config.timeout_or_default()).await {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                debug!(id, "delivery dropped: subscriber not ready within timeout");
            }
            Err(SendTimeoutError::Closed(_)) => {
                debug!(id, "delivery dropped: subscriber receiver gone");
            }
        }
    }
}

/// Anonymous-mode broadcast registry.
///
/// Cheap to clone; clones share the same registry (handle semantics). Every
/// instance owns its registry and identity counter — there is no process-wide
/// state.
///
/// ### Properties
/// - `subscribe`/`cancel` are safe from any number of concurrent callers.
/// - `notify_all` is fire-and-forget per subscriber and requires a Tokio
///   runtime (delivery runs on spawned tasks).
/// - Delivering to zero subscribers is a no-op.
pub struct Broadcaster<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: Clone + Send + 'static> Broadcaster<T> {
    /// Creates an empty broadcaster with default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty broadcaster with the given delivery settings.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            registry: Arc::new(Registry {
                clients: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// Registers a new subscriber.
    ///
    /// Allocates a fresh identity, creates the subscriber channel and returns
    /// the receive side together with a [`CancelHandle`] bound to that
    /// identity. The registry keeps the only send side; the channel closes
    /// when the subscription is cancelled (or the broadcaster is closed).
    pub async fn subscribe(&self) -> (mpsc::Receiver<T>, CancelHandle<T>) {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::channel(self.registry.config.capacity_clamped());
        let slot = Arc::new(Slot {
            sender: RwLock::new(Some(tx)),
        });
        self.registry.clients.write().await.insert(id, slot);
        trace!(id, "subscriber registered");
        (rx, CancelHandle::new(Arc::clone(&self.registry), id))
    }

    /// Broadcasts `value` to every subscriber registered at call time.
    ///
    /// Each subscriber gets an independent, detached delivery attempt bounded
    /// by the configured timeout; this call returns as soon as the attempts
    /// are spawned. A subscriber removed between the snapshot and its
    /// delivery is skipped, not an error.
    pub async fn notify_all(&self, value: T) {
        let targets: Vec<u64> = {
            let clients = self.registry.clients.read().await;
            clients.keys().copied().collect()
        };
        for id in targets {
            let registry = Arc::clone(&self.registry);
            let value = value.clone();
            tokio::spawn(async move {
                registry.deliver(id, value).await;
            });
        }
    }

    /// Number of currently registered subscriptions.
    ///
    /// Exact once concurrent subscribe/cancel calls quiesce; a transient
    /// in-flight mutation may or may not be reflected.
    pub async fn clients(&self) -> usize {
        self.registry.clients.read().await.len()
    }

    /// Cancels every registered subscription.
    ///
    /// Anomalies on individual cancellations are collected into one
    /// [`CloseError`] instead of aborting the shutdown; they should not occur
    /// during a single-threaded close.
    pub async fn close(&self) -> Result<(), CloseError> {
        let targets: Vec<u64> = {
            let clients = self.registry.clients.read().await;
            clients.keys().copied().collect()
        };
        let mut errors = Vec::new();
        for id in targets {
            if let Err(err) = self.registry.remove(id).await {
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CloseError { errors })
        }
    }
}

impl<T: Clone + Send + 'static> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> Observable<T> for Broadcaster<T> {
    async fn subscribe(&self) -> (mpsc::Receiver<T>, CancelHandle<T>) {
        Broadcaster::subscribe(self).await
    }

    async fn notify_all(&self, value: T) {
        Broadcaster::notify_all(self, value).await
    }
}

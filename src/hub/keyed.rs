//! # Keyed broadcaster: blocking delivery to caller-addressed clients.
//!
//! [`KeyedBroadcaster`] registers channels the *caller* owns under a
//! caller-supplied key, which buys two things the anonymous registry cannot
//! offer: single-target delivery ([`KeyedBroadcaster::notify_client`]) and
//! explicit de-registration by key.
//!
//! ## Rules
//! - **Blocking delivery, no timeout**: `notify_all` sends to every client
//!   sequentially and waits until each one accepts the value. A stalled
//!   consumer stalls the producer. This is the opposite contract from
//!   [`Broadcaster`](crate::Broadcaster) — at-least-once instead of
//!   best-effort — and the fork is intentional.
//! - **Caller owns the channel**: the registry only ever drops its own
//!   clone of the sender; it never closes a caller-supplied channel.
//! - **Last writer wins**: re-registering an existing key silently replaces
//!   the previous registration. A key becomes reusable the moment it is
//!   de-registered.
//! - **Iteration order is unspecified** across clients.
//!
//! Concurrently de-registering a key while re-registering the same key is
//! the caller's race to avoid; the registry only guarantees the two
//! mutations do not interleave.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, trace};

use crate::error::ClientError;

/// Keyed-mode broadcast registry.
///
/// Every instance owns its registry; there is no process-wide state.
pub struct KeyedBroadcaster<K, T> {
    clients: RwLock<HashMap<K, mpsc::Sender<T>>>,
}

impl<K, T> KeyedBroadcaster<K, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Number of currently registered clients.
    pub async fn clients(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl<K, T> KeyedBroadcaster<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Clone,
{
    /// Registers `sender` under `key`.
    ///
    /// An existing registration under the same key is silently replaced
    /// (last writer wins). The channel's lifecycle stays with the caller.
    pub async fn register_client(&self, key: K, sender: mpsc::Sender<T>) {
        let replaced = self.clients.write().await.insert(key.clone(), sender);
        if replaced.is_some() {
            debug!(key = ?key, "client re-registered, previous registration replaced");
        } else {
            trace!(key = ?key, "client registered");
        }
    }

    /// Removes the registration under `key`.
    ///
    /// Fails with [`ClientError::NotFound`], carrying the key, when nothing
    /// is registered under it.
    pub async fn deregister_client(&self, key: &K) -> Result<(), ClientError<K>> {
        match self.clients.write().await.remove(key) {
            Some(_) => {
                trace!(key = ?key, "client de-registered");
                Ok(())
            }
            None => Err(ClientError::NotFound { key: key.clone() }),
        }
    }

    /// Delivers `value` to every registered client, blocking until each one
    /// has accepted it.
    ///
    /// Sends run sequentially in unspecified order, without a registry-wide
    /// lock held across them and without a timeout. A client whose receiver
    /// is gone is skipped.
    pub async fn notify_all(&self, value: T) {
        let targets: Vec<(K, mpsc::Sender<T>)> = {
            let clients = self.clients.read().await;
            clients
                .iter()
                .map(|(key, tx)| (key.clone(), tx.clone()))
                .collect()
        };
        for (key, tx) in targets {
            if tx.send(value.clone()).await.is_err() {
                debug!(key = ?key, "client disconnected, delivery skipped");
            }
        }
    }

    /// Delivers `value` to exactly the client registered under `key`,
    /// blocking until it accepts.
    ///
    /// Fails with [`ClientError::NotFound`] for an absent key and
    /// [`ClientError::Disconnected`] when the client's receive side is gone.
    pub async fn notify_client(&self, key: &K, value: T) -> Result<(), ClientError<K>> {
        let tx = {
            let clients = self.clients.read().await;
            clients.get(key).cloned()
        };
        match tx {
            None => Err(ClientError::NotFound { key: key.clone() }),
            Some(tx) => tx
                .send(value)
                .await
                .map_err(|_| ClientError::Disconnected { key: key.clone() }),
        }
    }
}

impl<K, T> Default for KeyedBroadcaster<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const RECV_WINDOW: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_register_deregister_counts() {
        let hub: KeyedBroadcaster<String, u32> = KeyedBroadcaster::new();

        let mut receivers = Vec::new();
        for i in 1..=5 {
            let (tx, rx) = mpsc::channel(1);
            hub.register_client(format!("client{i}"), tx).await;
            receivers.push(rx);
        }
        assert_eq!(hub.clients().await, 5);

        hub.deregister_client(&"client1".to_string()).await.unwrap();
        hub.deregister_client(&"client2".to_string()).await.unwrap();
        assert_eq!(hub.clients().await, 3);

        for i in 3..=5 {
            hub.deregister_client(&format!("client{i}")).await.unwrap();
        }
        assert_eq!(hub.clients().await, 0);
    }

    #[tokio::test]
    async fn test_deregister_unknown_key_carries_key() {
        let hub: KeyedBroadcaster<&str, u32> = KeyedBroadcaster::new();
        assert_eq!(
            hub.deregister_client(&"ghost").await,
            Err(ClientError::NotFound { key: "ghost" }),
        );
    }

    #[tokio::test]
    async fn test_notify_client_targets_exactly_one() {
        let hub: KeyedBroadcaster<&str, u32> = KeyedBroadcaster::new();

        let (tx_a, mut rx_a) = mpsc::channel(1);
        let (tx_b, mut rx_b) = mpsc::channel(1);
        hub.register_client("a", tx_a).await;
        hub.register_client("b", tx_b).await;

        hub.notify_client(&"a", 42).await.unwrap();
        assert_eq!(timeout(RECV_WINDOW, rx_a.recv()).await.unwrap(), Some(42));
        assert!(rx_b.try_recv().is_err(), "only the targeted client receives");

        assert_eq!(
            hub.notify_client(&"missing", 1).await,
            Err(ClientError::NotFound { key: "missing" }),
        );
    }

    #[tokio::test]
    async fn test_notify_client_disconnected_receiver() {
        let hub: KeyedBroadcaster<&str, u32> = KeyedBroadcaster::new();

        let (tx, rx) = mpsc::channel(1);
        hub.register_client("gone", tx).await;
        drop(rx);

        assert_eq!(
            hub.notify_client(&"gone", 1).await,
            Err(ClientError::Disconnected { key: "gone" }),
        );
        // Still registered: de-registration is explicit in keyed mode.
        assert_eq!(hub.clients().await, 1);
    }

    #[tokio::test]
    async fn test_notify_all_blocks_until_accepted() {
        let hub: Arc<KeyedBroadcaster<&str, u32>> = Arc::new(KeyedBroadcaster::new());

        let (tx, mut rx) = mpsc::channel(1);
        hub.register_client("slow", tx).await;

        // Fills the client's buffer.
        hub.notify_all(1).await;

        // The next broadcast cannot finish until the client drains.
        let pending = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move { hub.notify_all(2).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(
            !pending.is_finished(),
            "keyed notify_all must block on an unready client"
        );

        assert_eq!(rx.recv().await, Some(1));
        timeout(RECV_WINDOW, pending)
            .await
            .expect("notify_all should finish once the client drains")
            .unwrap();
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_reregistration_replaces_silently() {
        let hub: KeyedBroadcaster<&str, u32> = KeyedBroadcaster::new();

        let (tx_old, mut rx_old) = mpsc::channel(1);
        let (tx_new, mut rx_new) = mpsc::channel(1);
        hub.register_client("c", tx_old).await;
        hub.register_client("c", tx_new).await;
        assert_eq!(hub.clients().await, 1);

        hub.notify_client(&"c", 9).await.unwrap();
        assert_eq!(timeout(RECV_WINDOW, rx_new.recv()).await.unwrap(), Some(9));
        assert!(rx_old.try_recv().is_err(), "old registration is dead");
    }

    #[tokio::test]
    async fn test_key_reusable_after_deregistration() {
        let hub: KeyedBroadcaster<&str, u32> = KeyedBroadcaster::new();

        let (tx1, _rx1) = mpsc::channel(1);
        hub.register_client("k", tx1).await;
        hub.deregister_client(&"k").await.unwrap();

        let (tx2, mut rx2) = mpsc::channel(1);
        hub.register_client("k", tx2).await;
        hub.notify_client(&"k", 5).await.unwrap();
        assert_eq!(timeout(RECV_WINDOW, rx2.recv()).await.unwrap(), Some(5));
    }
}

//! # fanout
//!
//! **fanout** is a process-local, typed publish/subscribe primitive for Rust.
//!
//! One or more producers notify a dynamic set of consumers through independent
//! per-subscriber channels. Subscribers come and go at any time; removal is
//! idempotent and never races a delivery into a closed channel.
//!
//! ## Architecture
//! ```text
//! Producers (many):                         Consumers (many):
//!
//!   notify_all(v) ──► Broadcaster ──► [slot 1: mpsc] ──► subscriber 1
//!                       registry   ├─► [slot 2: mpsc] ──► subscriber 2
//!                      (id → slot) └─► [slot N: mpsc] ──► subscriber N
//!                                       │
//!                                       └── each delivery is an independent
//!                                           task, bounded by Config.timeout
//! ```
//!
//! Two registry shapes share the same discipline but carry different delivery
//! contracts:
//!
//! - [`Broadcaster<T>`] — **anonymous** mode. Subscribers get an auto-assigned
//!   identity and a channel owned by the registry. `notify_all` fans out one
//!   detached delivery task per subscriber; a subscriber that is not ready to
//!   receive within the configured timeout has that delivery dropped silently.
//!   Best-effort, never blocks the producer.
//! - [`KeyedBroadcaster<K, T>`] — **keyed** mode. Callers register a channel
//!   they own under a key of their choosing, can target a single client with
//!   [`KeyedBroadcaster::notify_client`], and de-register by key. Delivery is
//!   a direct blocking send with no timeout: a stalled consumer stalls the
//!   producer. At-least-once, not best-effort.
//!
//! The asymmetry is deliberate and preserved by tests; pick the profile that
//! matches how much you trust your consumers.
//!
//! Above the core sits a small consumption helper, [`consume`] (and its
//! subscribing variant [`attach`]): a loop that pulls from one subscription
//! and invokes a handler until the subscription closes, an external
//! [`CancellationToken`](tokio_util::sync::CancellationToken) fires, or the
//! handler fails. It always releases the subscription on the way out and
//! reports a [`StopReason`] suitable for aggregation by a supervisor.
//!
//! ## Features
//! | Area             | Description                                                 | Key types                               |
//! |------------------|-------------------------------------------------------------|-----------------------------------------|
//! | **Broadcast**    | Fan out a value to every live subscriber, drop on timeout.  | [`Broadcaster`], [`Config`]             |
//! | **Targeting**    | Address one client by caller-supplied key, blocking send.   | [`KeyedBroadcaster`]                    |
//! | **Cancellation** | One-shot, idempotent de-registration capability.            | [`CancelHandle`], [`CancelError`]       |
//! | **Consumption**  | Drive a handler from a subscription until a terminal state. | [`consume`], [`attach`], [`StopReason`] |
//!
//! ## Example
//! ```rust
//! use fanout::{Broadcaster, CancelError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let hub: Broadcaster<String> = Broadcaster::new();
//!
//!     let (mut events, cancel) = hub.subscribe().await;
//!     assert_eq!(hub.clients().await, 1);
//!
//!     hub.notify_all("hello".to_string()).await;
//!     assert_eq!(events.recv().await.as_deref(), Some("hello"));
//!
//!     // De-registration is idempotent: the second call reports the anomaly
//!     // instead of double-closing anything.
//!     cancel.cancel().await.unwrap();
//!     assert_eq!(cancel.cancel().await, Err(CancelError::AlreadyDeregistered));
//!     assert_eq!(hub.clients().await, 0);
//! }
//! ```

mod config;
mod consumer;
mod error;
mod hub;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_NOTIFY_TIMEOUT};
pub use consumer::{attach, consume, StopReason};
pub use error::{CancelError, ClientError, CloseError};
pub use hub::{Broadcaster, CancelHandle, KeyedBroadcaster, Observable};

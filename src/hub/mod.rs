//! Subscription registries and delivery engines.
//!
//! This module contains both registry shapes and the pieces they share:
//!
//! - [`broadcaster`]: anonymous registry, timed fan-out delivery;
//! - [`keyed`]: keyed registry, blocking targeted delivery;
//! - [`cancel`]: the one-shot de-registration capability;
//! - [`observable`]: the subscribe/notify seam consumed by the
//!   consumption helper.
//!
//! See `lib.rs` for the system-level diagram and the delivery-contract
//! asymmetry between the two registries.

mod broadcaster;
mod cancel;
mod keyed;
mod observable;

pub use broadcaster::Broadcaster;
pub use cancel::CancelHandle;
pub use keyed::KeyedBroadcaster;
pub use observable::Observable;

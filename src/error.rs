//! Error types returned by the subscription registries.
//!
//! This module defines:
//!
//! - [`CancelError`] — de-registration anomalies in the anonymous registry.
//! - [`ClientError`] — keyed-registry failures, carrying the offending key.
//! - [`CloseError`] — the aggregate of anomalies seen during a bulk shutdown.
//!
//! None of these are fatal: every documented misuse (double-cancel, unknown
//! key) comes back as an ordinary value and the caller decides whether to
//! log, retry, or ignore. Dropped fan-out deliveries are deliberately *not*
//! part of this taxonomy — a timeout is an expected outcome of best-effort
//! delivery, not an error.

use std::fmt;

use thiserror::Error;

/// # Errors produced by cancelling an anonymous subscription.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelError {
    /// The subscription is no longer registered (double-cancel, or cancel
    /// after the broadcaster was closed).
    #[error("client already de-registered")]
    AlreadyDeregistered,
}

impl CancelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::CancelError;
    ///
    /// assert_eq!(
    ///     CancelError::AlreadyDeregistered.as_label(),
    ///     "client_already_deregistered",
    /// );
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CancelError::AlreadyDeregistered => "client_already_deregistered",
        }
    }
}

/// # Errors produced by keyed-registry operations.
///
/// Both variants carry the offending key for diagnostics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError<K: fmt::Debug> {
    /// De-registration or direct notify targeted a key that is not
    /// registered.
    #[error("client not found: {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: K,
    },

    /// The client is registered but its receive side is gone, so a blocking
    /// send can never complete.
    #[error("client {key:?} disconnected before delivery")]
    Disconnected {
        /// The key whose receiver was dropped.
        key: K,
    },
}

impl<K: fmt::Debug> ClientError<K> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::NotFound { .. } => "client_not_found",
            ClientError::Disconnected { .. } => "client_disconnected",
        }
    }
}

/// # Aggregate of anomalies encountered while closing a broadcaster.
///
/// [`Broadcaster::close`](crate::Broadcaster::close) cancels every
/// registered subscription and keeps going on individual failures; whatever
/// it collected ends up here rather than aborting the shutdown at the first
/// anomaly. Under a single-threaded shutdown this should stay empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("close aggregated {} cancellation failures", errors.len())]
pub struct CloseError {
    /// Individual cancellation failures, in registry snapshot order.
    pub errors: Vec<CancelError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_error_display() {
        let err = CancelError::AlreadyDeregistered;
        assert_eq!(err.to_string(), "client already de-registered");
    }

    #[test]
    fn test_client_error_carries_key() {
        let err = ClientError::NotFound { key: "client4" };
        assert_eq!(err.to_string(), r#"client not found: "client4""#);
        assert_eq!(err.as_label(), "client_not_found");

        let err = ClientError::Disconnected { key: 7u32 };
        assert_eq!(err.to_string(), "client 7 disconnected before delivery");
        assert_eq!(err.as_label(), "client_disconnected");
    }

    #[test]
    fn test_close_error_aggregates() {
        let err = CloseError {
            errors: vec![CancelError::AlreadyDeregistered; 2],
        };
        assert_eq!(err.to_string(), "close aggregated 2 cancellation failures");
        assert_eq!(err.errors.len(), 2);
    }
}

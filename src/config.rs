//! # Broadcaster configuration.
//!
//! Provides [`Config`], the per-broadcaster delivery settings.
//!
//! ## Sentinel values
//! - `timeout = 0s` → use [`DEFAULT_NOTIFY_TIMEOUT`] (5s)
//! - `capacity = 0` → clamped to 1 (smallest channel tokio can build)
//!
//! Sentinels keep the zero value usable; prefer the helper accessors over
//! sprinkling `0` checks across call sites.

use std::time::Duration;

/// Per-delivery timeout applied when [`Config::timeout`] is left unset.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery settings for an anonymous [`Broadcaster`](crate::Broadcaster).
///
/// ## Field semantics
/// - `timeout`: upper bound for one fan-out delivery attempt. A subscriber
///   that is not ready to receive within this window has that delivery
///   dropped (no retry, no error). `Duration::ZERO` means "unset" and falls
///   back to [`DEFAULT_NOTIFY_TIMEOUT`].
/// - `capacity`: buffer size of each subscriber channel, created at
///   subscribe time. `1` is the closest rendition of an unbuffered conduit;
///   `0` is clamped to `1`.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Upper bound for a single delivery attempt (`0s` = default 5s).
    pub timeout: Duration,

    /// Capacity of each subscriber channel (min 1; clamped).
    pub capacity: usize,
}

impl Config {
    /// Returns the effective per-delivery timeout.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use fanout::{Config, DEFAULT_NOTIFY_TIMEOUT};
    ///
    /// let mut cfg = Config::default();
    /// assert_eq!(cfg.timeout_or_default(), DEFAULT_NOTIFY_TIMEOUT);
    ///
    /// cfg.timeout = Duration::from_millis(250);
    /// assert_eq!(cfg.timeout_or_default(), Duration::from_millis(250));
    /// ```
    #[inline]
    pub fn timeout_or_default(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_NOTIFY_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the subscriber channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn capacity_clamped(&self) -> usize {
        self.capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 0s` (falls back to [`DEFAULT_NOTIFY_TIMEOUT`])
    /// - `capacity = 1` (rendezvous-style subscriber channels)
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            capacity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout_or_default(), DEFAULT_NOTIFY_TIMEOUT);
    }

    #[test]
    fn test_explicit_timeout_wins() {
        let cfg = Config {
            timeout: Duration::from_millis(50),
            ..Config::default()
        };
        assert_eq!(cfg.timeout_or_default(), Duration::from_millis(50));
    }

    #[test]
    fn test_capacity_clamped_to_one() {
        let cfg = Config {
            capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.capacity_clamped(), 1);

        let cfg = Config {
            capacity: 8,
            ..Config::default()
        };
        assert_eq!(cfg.capacity_clamped(), 8);
    }
}

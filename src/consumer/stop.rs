//! Terminal outcomes of a consumption loop.

/// Why a consumption loop stopped.
///
/// Returned by [`consume`](crate::consume) / [`attach`](crate::attach);
/// suitable for aggregation by whatever supervises the consumer tasks (for
/// example, collected from a `JoinSet` at shutdown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason<E> {
    /// The subscription channel closed (cancelled upstream). Clean stop.
    Closed,

    /// The external cancellation token fired before the channel closed.
    Cancelled,

    /// The handler reported a failure; the loop stopped at that value and
    /// the failure is carried here.
    HandlerFailed(E),
}

impl<E> StopReason<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::StopReason;
    ///
    /// let reason: StopReason<String> = StopReason::Cancelled;
    /// assert_eq!(reason.as_label(), "cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::Closed => "closed",
            StopReason::Cancelled => "cancelled",
            StopReason::HandlerFailed(_) => "handler_failed",
        }
    }

    /// The propagated handler failure, if that is why the loop stopped.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            StopReason::HandlerFailed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(StopReason::<&str>::Closed.as_label(), "closed");
        assert_eq!(StopReason::<&str>::Cancelled.as_label(), "cancelled");
        assert_eq!(StopReason::HandlerFailed("boom").as_label(), "handler_failed");
    }

    #[test]
    fn test_into_handler_error() {
        assert_eq!(StopReason::HandlerFailed("boom").into_handler_error(), Some("boom"));
        assert_eq!(StopReason::<&str>::Closed.into_handler_error(), None);
    }
}

//! # The consumption loop.
//!
//! One subscription, one handler, exactly one outstanding receive at a time.
//! The loop is a two-state machine:
//!
//! ```text
//! Running ──┬── channel closed ─────────► Stopped(Closed)
//!           ├── token cancelled ────────► Stopped(Cancelled)
//!           ├── handler returned Err ───► Stopped(HandlerFailed)
//!           └── handler returned Ok ────► Running
//! ```
//!
//! Whatever the terminal state, the subscription is released through its
//! [`CancelHandle`] before the reason is returned — acquisition is scoped to
//! the loop. Release after a clean close reports
//! `AlreadyDeregistered` and is ignored.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::consumer::stop::StopReason;
use crate::hub::{CancelHandle, Observable};

enum State<E> {
    Running,
    Stopped(StopReason<E>),
}

/// Repeatedly receives from `events` and feeds each value to `handler`
/// until a terminal state is reached.
///
/// Terminates when the channel closes (clean), when `token` is cancelled,
/// or when the handler fails; see the module diagram. Always releases the
/// subscription on the way out.
pub async fn consume<T, F, Fut, E>(
    token: CancellationToken,
    mut events: mpsc::Receiver<T>,
    cancel: CancelHandle<T>,
    mut handler: F,
) -> StopReason<E>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut state = State::Running;
    let reason = loop {
        state = match state {
            State::Stopped(reason) => break reason,
            State::Running => {
                tokio::select! {
                    _ = token.cancelled() => State::Stopped(StopReason::Cancelled),
                    next = events.recv() => match next {
                        None => State::Stopped(StopReason::Closed),
                        Some(value) => match handler(value).await {
                            Ok(()) => State::Running,
                            Err(error) => State::Stopped(StopReason::HandlerFailed(error)),
                        },
                    },
                }
            }
        };
    };

    // Scoped acquisition: the subscription never outlives the loop. After a
    // clean close it is already gone and the release reports the anomaly.
    let _ = cancel.cancel().await;
    trace!(id = cancel.id(), label = reason.as_label(), "consumer stopped");
    reason
}

/// Subscribes to `hub`, then [`consume`]s the new subscription.
///
/// The shape to spawn onto a `JoinSet`: the supervising side cancels the
/// token (or closes the hub) and aggregates the returned [`StopReason`]s.
pub async fn attach<O, T, F, Fut, E>(
    token: CancellationToken,
    hub: &O,
    handler: F,
) -> StopReason<E>
where
    O: Observable<T> + ?Sized,
    T: Send + 'static,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let (events, cancel) = hub.subscribe().await;
    consume(token, events, cancel, handler).await
}

//! # Consumption helper walkthrough
//!
//! Models a long-running component that reacts to external events: an
//! accumulator attached to the hub through [`fanout::attach`]. The driver
//! broadcasts a series of payloads, waits for them to settle, then tears the
//! consumer down and inspects its terminal [`fanout::StopReason`].
//!
//! ## Run
//! ```bash
//! cargo run --example handler
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

use fanout::{Broadcaster, StopReason, attach};

#[derive(Clone, Debug)]
struct Event {
    id: usize,
    payload: i32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let hub: Broadcaster<Event> = Broadcaster::new();
    let token = CancellationToken::new();
    let total = Arc::new(AtomicI32::new(0));

    let mut consumers: JoinSet<StopReason<String>> = JoinSet::new();
    {
        let hub = hub.clone();
        let token = token.clone();
        let total = Arc::clone(&total);
        consumers.spawn(async move {
            attach(token, &hub, move |ev: Event| {
                let total = Arc::clone(&total);
                async move {
                    info!(id = ev.id, payload = ev.payload, "received event");
                    total.fetch_add(ev.payload, Ordering::Relaxed);
                    Ok(())
                }
            })
            .await
        });
    }

    // Give the consumer a beat to register before producing.
    while hub.clients().await == 0 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    for (id, payload) in [1, 2, 3, 5, -1, 10].into_iter().enumerate() {
        hub.notify_all(Event { id, payload }).await;
    }

    // Allow events to settle.
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("final result: {}", total.load(Ordering::Relaxed));

    // Closing the hub closes the subscription; the consumer stops cleanly.
    if let Err(err) = hub.close().await {
        println!("error: {err}");
    }
    while let Some(joined) = consumers.join_next().await {
        match joined {
            Ok(reason) => println!("consumer stopped: {}", reason.as_label()),
            Err(err) => println!("consumer panicked: {err}"),
        }
    }
}

//! # Basic broadcast walkthrough
//!
//! Three subscribers print every event they receive. The driver broadcasts,
//! cancels the first subscriber twice (the second attempt reports the
//! anomaly), broadcasts again to the survivors, then shuts the hub down.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;

use tokio::task::JoinSet;

use fanout::Broadcaster;

#[derive(Clone, Debug)]
struct Event {
    id: u32,
    message: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let hub: Broadcaster<Event> = Broadcaster::new();

    let mut runners = JoinSet::new();
    let mut cancels = Vec::new();
    for i in 0..3 {
        let (mut events, cancel) = hub.subscribe().await;
        cancels.push(cancel);
        runners.spawn(async move {
            while let Some(ev) = events.recv().await {
                println!("runner: {i}\tid: {}\tmessage: {}", ev.id, ev.message);
            }
        });
    }

    println!("registered clients: {}", hub.clients().await);

    hub.notify_all(Event {
        id: 1,
        message: "hello world".into(),
    })
    .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Remove the first subscriber, then try again: the second attempt is a
    // well-defined anomaly, not a crash.
    if let Err(err) = cancels[0].cancel().await {
        println!("error: {err}");
    }
    if let Err(err) = cancels[0].cancel().await {
        println!("error: {err}");
    }

    hub.notify_all(Event {
        id: 2,
        message: "hello survivors".into(),
    })
    .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("registered clients: {}", hub.clients().await);

    if let Err(err) = hub.close().await {
        println!("error: {err}");
    }
    while runners.join_next().await.is_some() {}

    println!("registered clients: {}", hub.clients().await);
}

//! # Keyed registry walkthrough
//!
//! Clients register channels they own under string keys. The driver
//! broadcasts to everyone, targets a single client, de-registers one key and
//! shows the "client not found" anomaly for a stranger.
//!
//! ## Run
//! ```bash
//! cargo run --example keyed
//! ```

use tokio::sync::mpsc;

use fanout::KeyedBroadcaster;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let hub: KeyedBroadcaster<String, String> = KeyedBroadcaster::new();

    let mut receivers = Vec::new();
    for i in 1..=3 {
        let (tx, rx) = mpsc::channel(8);
        hub.register_client(format!("client{i}"), tx).await;
        receivers.push((format!("client{i}"), rx));
    }
    println!("registered clients: {}", hub.clients().await);

    hub.notify_all("broadcast to everyone".to_string()).await;

    hub.notify_client(&"client2".to_string(), "just for you".to_string())
        .await
        .expect("client2 is registered");

    if let Err(err) = hub.notify_client(&"stranger".to_string(), "hello?".to_string()).await {
        println!("error: {err}");
    }

    for (name, rx) in &mut receivers {
        while let Ok(msg) = rx.try_recv() {
            println!("{name}: {msg}");
        }
    }

    hub.deregister_client(&"client1".to_string())
        .await
        .expect("client1 is registered");
    if let Err(err) = hub.deregister_client(&"client1".to_string()).await {
        println!("error: {err}");
    }
    println!("registered clients: {}", hub.clients().await);
}

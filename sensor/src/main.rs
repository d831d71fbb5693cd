mod reading;

use reading::PresenceSimulator;
use std::env;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let server_url = env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let interval_ms: u64 = env::var("INTERVAL_MS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .unwrap_or(1000);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting presence sensor");
    info!("Relay: {}, interval: {}ms", server_url, interval_ms);

    let ingest_url = format!("{}/api/human-data", server_url);
    let client = reqwest::Client::new();

    let mut rng = rand::thread_rng();
    let mut simulator = PresenceSimulator::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    let mut sent = 0u64;

    loop {
        ticker.tick().await;

        let payload = simulator.next_reading(&mut rng);

        match client.post(&ingest_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                sent += 1;
                if sent % 60 == 0 {
                    info!("Posted {} readings", sent);
                }
            }
            Ok(response) => {
                warn!("Relay rejected reading: {}", response.status());
            }
            Err(e) => {
                error!("Failed to post reading: {}", e);
            }
        }
    }
}

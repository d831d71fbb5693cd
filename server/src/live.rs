use crate::broadcast::Broadcaster;
use crate::metrics::CONNECTED_VIEWERS;
use axum::extract::ws::{Message, WebSocket};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

/// Forwards every published reading to one connected viewer as a JSON text
/// frame. The connection task owns the viewer's broadcast receiver, so
/// membership ends when this returns.
pub async fn handle_viewer(mut socket: WebSocket, broadcaster: Broadcaster) {
    let mut rx = broadcaster.subscribe();

    CONNECTED_VIEWERS.inc();
    debug!(
        "Viewer connected ({} active)",
        broadcaster.subscriber_count()
    );

    loop {
        tokio::select! {
            update = rx.recv() => {
                match update {
                    Ok(reading) => {
                        let payload = match serde_json::to_string(&reading) {
                            Ok(p) => p,
                            Err(e) => {
                                error!("Failed to serialize reading {}: {}", reading.id, e);
                                continue;
                            }
                        };

                        if socket.send(Message::Text(payload)).await.is_err() {
                            // Transport dropped mid-send; only this viewer is affected
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Viewer lagging, {} readings dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Viewers have nothing to say; ignore pings and stray frames
                    }
                    Some(Err(_)) => break,
                }
            }
        }
    }

    drop(rx);
    CONNECTED_VIEWERS.dec();
    debug!(
        "Viewer disconnected ({} active)",
        broadcaster.subscriber_count()
    );
}

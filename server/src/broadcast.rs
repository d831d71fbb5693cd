use crate::model::Reading;
use tokio::sync::broadcast;

/// Fan-out channel for newly ingested readings.
///
/// Constructed once in `main` and handed to the router, so the ingest
/// handler's dependency on it is visible in its signature. Subscribers that
/// connect after a publish never see it; there is no replay.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<Reading>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes one reading to every currently connected subscriber.
    /// Returns the number of subscribers reached; with zero subscribers the
    /// publish is a no-op.
    pub fn publish(&self, reading: &Reading) -> usize {
        self.tx.send(reading.clone()).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Reading> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn reading() -> Reading {
        Reading {
            id: Uuid::new_v4(),
            human_presence: "Detected".to_string(),
            motion: "Moving".to_string(),
            move_range: 12.5,
            avg_move_range: 9.0,
            alert_active: true,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let broadcaster = Broadcaster::new(16);
        assert_eq!(broadcaster.subscriber_count(), 0);
        assert_eq!(broadcaster.publish(&reading()), 0);
    }

    #[test]
    fn test_subscriber_receives_publish() {
        tokio_test::block_on(async {
            let broadcaster = Broadcaster::new(16);
            let mut rx = broadcaster.subscribe();

            let sent = reading();
            assert_eq!(broadcaster.publish(&sent), 1);

            let received = rx.recv().await.unwrap();
            assert_eq!(received.id, sent.id);
            assert_eq!(received.human_presence, sent.human_presence);
        });
    }

    #[test]
    fn test_late_subscriber_misses_prior_publish() {
        tokio_test::block_on(async {
            let broadcaster = Broadcaster::new(16);

            let mut early = broadcaster.subscribe();
            let first = reading();
            broadcaster.publish(&first);

            let mut late = broadcaster.subscribe();
            let second = reading();
            broadcaster.publish(&second);

            assert_eq!(early.recv().await.unwrap().id, first.id);
            assert_eq!(early.recv().await.unwrap().id, second.id);
            // The late subscriber only ever sees the second reading
            assert_eq!(late.recv().await.unwrap().id, second.id);
            assert!(late.try_recv().is_err());
        });
    }
}

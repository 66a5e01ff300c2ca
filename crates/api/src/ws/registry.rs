use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{watch, Mutex};

/// Sender half of one subscriber's snapshot slot.
pub type SubscriberSender = watch::Sender<Option<Message>>;

/// Receiver half of one subscriber's snapshot slot. Holds at most the
/// newest undelivered snapshot; an unread one is replaced, never queued.
pub type SubscriberReceiver = watch::Receiver<Option<Message>>;

/// The set of live broadcast-feed subscribers.
///
/// A single mutex guards membership. Fan-out copies the senders out under
/// the lock and delivers after releasing it, so a slow connection never
/// holds up registration or deregistration of others. Designed to be
/// wrapped in `Arc` and shared.
pub struct ConnectionRegistry {
    subscribers: Mutex<HashMap<String, SubscriberSender>>,
}

impl ConnectionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Register a connection.
    ///
    /// Returns the receiver half of the snapshot slot; the session writes
    /// whatever lands in it to its socket. Registering an id that is
    /// already present replaces the previous subscriber.
    pub async fn register(&self, conn_id: String) -> SubscriberReceiver {
        let (tx, rx) = watch::channel(None);
        self.subscribers.lock().await.insert(conn_id, tx);
        rx
    }

    /// Remove a connection. Returns whether it was registered.
    pub async fn deregister(&self, conn_id: &str) -> bool {
        self.subscribers.lock().await.remove(conn_id).is_some()
    }

    /// Point-in-time copy of the current subscriber senders.
    pub async fn snapshot(&self) -> Vec<(String, SubscriberSender)> {
        self.subscribers
            .lock()
            .await
            .iter()
            .map(|(id, sender)| (id.clone(), sender.clone()))
            .collect()
    }

    /// Deliver a message to every subscriber registered at call time.
    ///
    /// A subscriber that has not yet written the previous snapshot gets it
    /// overwritten. Subscribers whose receiver is gone are skipped; their
    /// session deregisters itself on the way out. Returns the number of
    /// subscribers the message was handed to.
    pub async fn broadcast(&self, message: Message) -> usize {
        let targets = self.snapshot().await;
        let mut delivered = 0;
        for (conn_id, sender) in targets {
            if sender.send(Some(message.clone())).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(conn_id = %conn_id, "Skipping closed subscriber");
            }
        }
        delivered
    }

    /// Return the current number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Send a Close frame to every subscriber, then clear the set.
    ///
    /// Used during shutdown after the sessions have been cancelled.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.lock().await;
        let count = subscribers.len();
        for sender in subscribers.values() {
            let _ = sender.send(Some(Message::Close(None)));
        }
        subscribers.clear();
        tracing::info!(count, "Closed all broadcast subscribers");
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Broadcast bus built on tokio broadcast channels.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::types::{Event, EventEnvelope};

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of task lifecycle events to any number of subscribers.
///
/// Cheap to clone; all clones share the same channel. Publishing never
/// blocks: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    published: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity bounds how far a slow subscriber may lag before it starts
    /// losing events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wrap the event in an envelope and publish it. Returns the number of
    /// subscribers that received it.
    pub fn publish(&self, event: Event) -> usize {
        self.publish_envelope(EventEnvelope::new(event))
    }

    pub fn publish_envelope(&self, envelope: EventEnvelope) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("published_count", &self.published_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_event(task_id: &str, percent: f64) -> Event {
        Event::TaskProgress {
            task_id: task_id.to_string(),
            percent,
        }
    }

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let sent = bus.publish(progress_event("t-1", 10.0));
        assert_eq!(sent, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.task_id(), Some("t-1"));
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let sent = bus.publish(progress_event("t-1", 55.0));
        assert_eq!(sent, 2);

        assert_eq!(rx1.recv().await.unwrap().event.task_id(), Some("t-1"));
        assert_eq!(rx2.recv().await.unwrap().event.task_id(), Some("t-1"));
    }

    #[tokio::test]
    async fn test_no_subscribers_drops_event() {
        let bus = EventBus::new();

        let sent = bus.publish(progress_event("t-1", 10.0));

        assert_eq!(sent, 0);
        assert_eq!(bus.published_count(), 1);
    }

    #[tokio::test]
    async fn test_published_count() {
        let bus = EventBus::new();
        assert_eq!(bus.published_count(), 0);

        bus.publish(progress_event("t-1", 10.0));
        bus.publish(progress_event("t-1", 20.0));

        assert_eq!(bus.published_count(), 2);
    }

    #[test]
    fn test_clones_share_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus2.subscribe();
        assert_eq!(bus1.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(progress_event("t-1", 10.0));
        bus.publish(progress_event("t-1", 55.0));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();

        match (first.event, second.event) {
            (Event::TaskProgress { percent: a, .. }, Event::TaskProgress { percent: b, .. }) => {
                assert_eq!(a, 10.0);
                assert_eq!(b, 55.0);
            }
            _ => panic!("wrong event types"),
        }
    }
}

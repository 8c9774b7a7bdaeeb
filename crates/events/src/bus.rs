//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Workflows publish only after their transaction has committed.

use hvacdesk_core::lifecycle::LifecycleEvent;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use hvacdesk_events::EventBus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
/// ```
pub struct EventBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: LifecycleEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            tracing::debug!(event = name, "No subscribers for lifecycle event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use hvacdesk_core::lifecycle::InquirySnapshot;
    use hvacdesk_core::vocabulary::Priority;

    use super::*;

    fn inquiry_event(subject: &str) -> LifecycleEvent {
        LifecycleEvent::InquiryReceived {
            inquiry: InquirySnapshot {
                inquiry_id: 1,
                inquiry_ref: uuid::Uuid::nil(),
                contact_name: "Jane".into(),
                contact_email: "jane@example.com".into(),
                subject: subject.into(),
                message: "Hello".into(),
                service_name: None,
                priority: Priority::Normal,
            },
        }
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(inquiry_event("Quote"));

        assert_eq!(rx1.recv().await.unwrap().name(), "inquiry.received");
        assert_eq!(rx2.recv().await.unwrap().recipient(), "jane@example.com");
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        EventBus::default().publish(inquiry_event("Orphan"));
    }
}

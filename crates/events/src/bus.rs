//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the HTTP handlers that
//! publish and the background refresher that consumes.

use chrono::{DateTime, Utc};
use fitslot_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

pub const AVAILABILITY_CHANGED: &str = "availability.changed";
pub const BREAKS_CHANGED: &str = "breaks.changed";
pub const HOLIDAYS_CHANGED: &str = "holidays.changed";
pub const SETTINGS_CHANGED: &str = "settings.changed";
pub const BOOKING_CREATED: &str = "booking.created";
pub const BOOKING_STATUS_CHANGED: &str = "booking.status_changed";

// ---------------------------------------------------------------------------
// ScheduleEvent
// ---------------------------------------------------------------------------

/// A change to one trainer's schedule or bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Dot-separated event name, e.g. `"holidays.changed"`.
    pub event_type: String,

    /// Trainer whose open slots are affected.
    pub trainer_id: DbId,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl ScheduleEvent {
    /// Create an event with an empty payload.
    pub fn new(event_type: impl Into<String>, trainer_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            trainer_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest un-consumed events are dropped and
/// slow receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<ScheduleEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Dropped silently when nobody is subscribed.
    pub fn publish(&self, event: ScheduleEvent) {
        tracing::trace!(
            event_type = %event.event_type,
            trainer_id = event.trainer_id,
            "Schedule event published",
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_event_with_payload() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            ScheduleEvent::new(HOLIDAYS_CHANGED, 42)
                .with_payload(serde_json::json!({"holiday_id": 7})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, HOLIDAYS_CHANGED);
        assert_eq!(received.trainer_id, 42);
        assert_eq!(received.payload["holiday_id"], 7);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ScheduleEvent::new(BOOKING_CREATED, 1));

        assert_eq!(rx1.recv().await.unwrap().event_type, BOOKING_CREATED);
        assert_eq!(rx2.recv().await.unwrap().event_type, BOOKING_CREATED);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        bus.publish(ScheduleEvent::new(SETTINGS_CHANGED, 3));
    }

    #[tokio::test]
    async fn small_buffer_reports_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for trainer_id in 0..5 {
            bus.publish(ScheduleEvent::new(AVAILABILITY_CHANGED, trainer_id));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(rx.recv().await.unwrap().trainer_id, 3);
    }
}

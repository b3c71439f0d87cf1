use std::sync::Arc;

use fitslot_core::types::DbId;
use fitslot_db::ScheduleStore;
use fitslot_events::{EventBus, ScheduleEvent};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Schedule persistence (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn ScheduleStore>,
    pub config: Arc<ServerConfig>,
    /// Change feed consumed by the open-slot listener.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn store(&self) -> &dyn ScheduleStore {
        self.store.as_ref()
    }

    /// Announce a change to `trainer_id`'s schedule.
    pub fn publish(&self, event_type: &str, trainer_id: DbId, payload: serde_json::Value) {
        self.event_bus
            .publish(ScheduleEvent::new(event_type, trainer_id).with_payload(payload));
    }
}

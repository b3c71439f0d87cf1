//! Background tasks spawned by the API binary.
//!
//! Each task accepts a [`CancellationToken`] for graceful shutdown.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Spawn the listener that regenerates a trainer's open slots whenever a
/// handler publishes a schedule change.
pub fn spawn_open_slot_listener(state: &AppState, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(fitslot_worker::refresh::listen(
        state.store.clone(),
        state.event_bus.subscribe(),
        state.config.refresh.horizon_days,
        cancel,
    ))
}

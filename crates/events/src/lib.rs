//! In-process change feed for schedule mutations.
//!
//! The API publishes a [`ScheduleEvent`] whenever something that shapes a
//! trainer's open slots changes; the slot refresher subscribes and
//! regenerates the affected trainer.

pub mod bus;

pub use bus::{EventBus, ScheduleEvent};

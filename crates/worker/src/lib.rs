//! Schedule services shared by the API and the background refresher.
//!
//! - [`materializer`] regenerates a trainer's open slots over the horizon.
//! - [`booking`] runs the two-phase booking flow and status transitions.
//! - [`schedule`] builds the per-day slot view.
//! - [`refresh`] keeps open slots current from the change feed and on a timer.

pub mod booking;
pub mod config;
pub mod error;
pub mod materializer;
pub mod refresh;
pub mod schedule;

pub use error::{WorkerError, WorkerResult};

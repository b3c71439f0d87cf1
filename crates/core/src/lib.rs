//! Pure booking-availability logic for the fitslot marketplace.
//!
//! Everything in this crate is synchronous and free of I/O so it can be
//! shared by the storage layer, the slot materializer and the HTTP API.

pub mod availability;
pub mod booking;
pub mod civil_time;
pub mod error;
pub mod interval;
pub mod materialize;
pub mod slots;
pub mod timezone;
pub mod types;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO carrying already-validated values for inserts
//! - Conversions into the pure `fitslot_core` types where the schedule
//!   computations need them

pub mod availability;
pub mod booking;
pub mod holiday;
pub mod open_slot;
pub mod schedule_break;
pub mod schedule_settings;
pub mod trainer;

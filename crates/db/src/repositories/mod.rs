//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod availability_window_repo;
pub mod booking_repo;
pub mod holiday_repo;
pub mod open_slot_repo;
pub mod schedule_break_repo;
pub mod schedule_settings_repo;
pub mod trainer_repo;

pub use availability_window_repo::AvailabilityWindowRepo;
pub use booking_repo::BookingRepo;
pub use holiday_repo::HolidayRepo;
pub use open_slot_repo::OpenSlotRepo;
pub use schedule_break_repo::ScheduleBreakRepo;
pub use schedule_settings_repo::ScheduleSettingsRepo;
pub use trainer_repo::TrainerRepo;

//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use fitslot_core::availability::validate_date_range;
use fitslot_core::error::CoreError;
use serde::Deserialize;

/// Inclusive date range (`?from=&to=`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeParams {
    /// Reject ranges ending before they start.
    pub fn validated(&self) -> Result<(NaiveDate, NaiveDate), CoreError> {
        validate_date_range(self.from, self.to)?;
        Ok((self.from, self.to))
    }
}

/// `?date=&duration=` for the day slot view.
#[derive(Debug, Deserialize)]
pub struct DaySlotsParams {
    pub date: NaiveDate,
    /// Slot length in minutes; defaults to the trainer's setting.
    pub duration: Option<u32>,
}

/// `?horizon_days=` for open-slot regeneration.
#[derive(Debug, Deserialize)]
pub struct RegenerateParams {
    pub horizon_days: Option<u32>,
}

//! Booking status lifecycle, busy-interval derivation and conflict checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::civil_time::{format_hhmm, MINUTES_PER_DAY};
use crate::error::CoreError;
use crate::interval::Interval;
use crate::types::Minute;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Booking status as stored in `bookings.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status blocks its interval.
    pub fn occupies_time(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Statuses reachable from `self`.
    ///
    /// `Accepted -> Cancelled` is additionally gated on the booking not having
    /// elapsed; that check needs a clock and lives with the caller.
    pub fn valid_transitions(self) -> &'static [BookingStatus] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Declined],
            Self::Accepted => &[Self::Cancelled],
            Self::Declined | Self::Cancelled => &[],
        }
    }

    pub fn can_transition(self, to: BookingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a state transition, returning a conflict error for invalid ones.
    pub fn validate_transition(self, to: BookingStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Invalid booking transition: {self} -> {to}"
            )))
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    /// Case-insensitive. `rejected` is accepted as an alias of `declined`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" | "rejected" => Ok(Self::Declined),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown booking status: '{other}'"
            ))),
        }
    }
}

/// Whether a raw stored status frees its interval.
///
/// Unknown statuses are treated as occupying time.
pub fn releases_time(raw_status: &str) -> bool {
    matches!(
        raw_status.trim().to_ascii_lowercase().as_str(),
        "declined" | "cancelled" | "canceled" | "rejected"
    )
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Who initiated a booking. Determines the initial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingOrigin {
    /// End-user self-service booking.
    Client,
    /// Trainer quick-book.
    Trainer,
}

impl BookingOrigin {
    pub fn initial_status(self) -> BookingStatus {
        match self {
            Self::Client => BookingStatus::Pending,
            Self::Trainer => BookingStatus::Accepted,
        }
    }
}

// ---------------------------------------------------------------------------
// Busy derivation
// ---------------------------------------------------------------------------

/// Time fields of a stored booking row, with the optional shape rows have
/// at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSpan {
    pub start_minute: Minute,
    pub end_minute: Option<Minute>,
    pub duration_minutes: Option<Minute>,
    pub status: String,
}

impl BookingSpan {
    /// The effective end: the stored end if present, otherwise
    /// `start + duration`, clamped to the day. `None` if neither is known.
    pub fn end_minute(&self) -> Option<Minute> {
        let end = match (self.end_minute, self.duration_minutes) {
            (Some(end), _) => end,
            (None, Some(duration)) => self.start_minute.saturating_add(duration),
            (None, None) => return None,
        };
        Some(end.min(MINUTES_PER_DAY))
    }

    /// The occupied interval, or `None` if the row cannot be normalized.
    pub fn interval(&self) -> Option<Interval> {
        self.end_minute()
            .map(|end| Interval::new(self.start_minute, end))
            .filter(|i| !i.is_empty())
    }
}

/// Busy intervals for the time-occupying rows of `rows`.
///
/// Declined/cancelled/rejected rows are dropped, as are rows whose end cannot
/// be determined. No merging is performed.
pub fn bookings_to_busy(rows: &[BookingSpan]) -> Vec<Interval> {
    rows.iter()
        .filter(|row| !releases_time(&row.status))
        .filter_map(BookingSpan::interval)
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a proposed booking interval against the busy set.
///
/// Fails with [`CoreError::InvalidRange`] for an empty or out-of-day interval
/// and [`CoreError::Conflict`] if it overlaps any busy interval.
pub fn validate_booking(proposed: Interval, busy: &[Interval]) -> Result<(), CoreError> {
    if proposed.is_empty() || proposed.end > MINUTES_PER_DAY {
        return Err(CoreError::InvalidRange(format!(
            "Booking end ({}) must be after start ({}) and within the day",
            proposed.end, proposed.start
        )));
    }
    if let Some(clash) = busy.iter().find(|b| proposed.overlaps(b)) {
        return Err(CoreError::Conflict(format!(
            "Slot {}-{} is no longer available (overlaps {}-{})",
            format_hhmm(proposed.start),
            format_hhmm(proposed.end),
            format_hhmm(clash.start),
            format_hhmm(clash.end),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::slots::build_slots;

    fn span(start: Minute, end: Option<Minute>, duration: Option<Minute>, status: &str) -> BookingSpan {
        BookingSpan {
            start_minute: start,
            end_minute: end,
            duration_minutes: duration,
            status: status.to_string(),
        }
    }

    // -- status --------------------------------------------------------------

    #[test]
    fn parses_statuses_case_insensitively() {
        assert_eq!("PENDING".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert_eq!("Rejected".parse::<BookingStatus>().unwrap(), BookingStatus::Declined);
        assert!("archived".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn pending_can_be_accepted_or_declined() {
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Accepted));
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Declined));
        assert!(!BookingStatus::Pending.can_transition(BookingStatus::Cancelled));
    }

    #[test]
    fn accepted_can_only_be_cancelled() {
        assert_eq!(BookingStatus::Accepted.valid_transitions(), &[BookingStatus::Cancelled]);
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(BookingStatus::Declined.valid_transitions().is_empty());
        assert!(BookingStatus::Cancelled.valid_transitions().is_empty());
        assert_matches!(
            BookingStatus::Cancelled.validate_transition(BookingStatus::Accepted),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn origin_sets_initial_status() {
        assert_eq!(BookingOrigin::Client.initial_status(), BookingStatus::Pending);
        assert_eq!(BookingOrigin::Trainer.initial_status(), BookingStatus::Accepted);
    }

    // -- busy derivation -----------------------------------------------------

    #[test]
    fn released_rows_do_not_occupy_time() {
        let rows = [
            span(480, Some(540), None, "accepted"),
            span(540, Some(600), None, "CANCELLED"),
            span(600, Some(660), None, "declined"),
            span(660, Some(720), None, "rejected"),
            span(720, Some(780), None, "Pending"),
        ];
        assert_eq!(
            bookings_to_busy(&rows),
            vec![Interval::new(480, 540), Interval::new(720, 780)]
        );
    }

    #[test]
    fn missing_end_falls_back_to_duration() {
        let rows = [span(600, None, Some(45), "pending")];
        assert_eq!(bookings_to_busy(&rows), vec![Interval::new(600, 645)]);
    }

    #[test]
    fn stored_end_wins_over_duration() {
        assert_eq!(span(600, Some(630), Some(90), "pending").end_minute(), Some(630));
    }

    #[test]
    fn huge_duration_clamps_to_end_of_day() {
        let row = span(600, None, Some(u32::MAX), "pending");
        assert_eq!(row.end_minute(), Some(MINUTES_PER_DAY));
        assert_eq!(row.interval(), Some(Interval::new(600, MINUTES_PER_DAY)));
    }

    #[test]
    fn rows_without_end_or_duration_are_skipped() {
        assert!(bookings_to_busy(&[span(600, None, None, "accepted")]).is_empty());
    }

    #[test]
    fn overlapping_rows_are_not_merged() {
        let rows = [
            span(480, Some(560), None, "accepted"),
            span(500, Some(600), None, "pending"),
        ];
        assert_eq!(bookings_to_busy(&rows).len(), 2);
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn overlapping_proposal_conflicts() {
        let busy = [Interval::new(540, 600)];
        assert_matches!(
            validate_booking(Interval::new(570, 630), &busy),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn adjacent_proposal_is_ok() {
        let busy = [Interval::new(540, 600)];
        assert!(validate_booking(Interval::new(600, 660), &busy).is_ok());
        assert!(validate_booking(Interval::new(480, 540), &busy).is_ok());
    }

    #[test]
    fn empty_proposal_is_an_invalid_range() {
        assert_matches!(
            validate_booking(Interval::new(600, 600), &[]),
            Err(CoreError::InvalidRange(_))
        );
    }

    #[test]
    fn available_slot_validates_as_ok() {
        let busy = [Interval::new(510, 570), Interval::new(700, 760)];
        for slot in build_slots(&[Interval::new(480, 900)], &busy, 30, 30) {
            if slot.available {
                assert!(validate_booking(slot.interval(), &busy).is_ok());
            } else {
                assert!(validate_booking(slot.interval(), &busy).is_err());
            }
        }
    }
}

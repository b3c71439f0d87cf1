//! Fixed-duration slot generation over availability windows.

use serde::Serialize;

use crate::civil_time::MINUTES_PER_DAY;
use crate::interval::{overlaps_any, Interval};
use crate::types::Minute;

/// A candidate booking slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: Minute,
    pub end: Minute,
    /// `false` when the slot overlaps a busy interval.
    pub available: bool,
}

impl Slot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Slice `windows` into `duration`-long candidates spaced `step` apart.
///
/// For each window the cursor starts at the window start and advances by
/// `step` while `cursor + duration <= window.end`. Candidates overlapping any
/// `busy` interval are returned with `available = false`. Output order is the
/// generation order: windows as given, ascending start inside each window.
///
/// Window ends are clamped to the day boundary. A zero `duration` or `step`
/// yields no slots.
pub fn build_slots(
    windows: &[Interval],
    busy: &[Interval],
    duration: Minute,
    step: Minute,
) -> Vec<Slot> {
    if duration == 0 || step == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for window in windows {
        let end = window.end.min(MINUTES_PER_DAY);
        let mut cursor = window.start;
        while cursor + duration <= end {
            let candidate = Interval::new(cursor, cursor + duration);
            slots.push(Slot {
                start: candidate.start,
                end: candidate.end,
                available: !overlaps_any(&candidate, busy),
            });
            cursor += step;
        }
    }
    slots
}

/// Only the available candidates of [`build_slots`].
pub fn available_slots(
    windows: &[Interval],
    busy: &[Interval],
    duration: Minute,
    step: Minute,
) -> Vec<Interval> {
    build_slots(windows, busy, duration, step)
        .into_iter()
        .filter(|s| s.available)
        .map(|s| s.interval())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: Minute, end: Minute) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn single_window_two_hourly_slots() {
        let slots = build_slots(&[iv(480, 600)], &[], 60, 60);
        assert_eq!(
            slots,
            vec![
                Slot { start: 480, end: 540, available: true },
                Slot { start: 540, end: 600, available: true },
            ]
        );
    }

    #[test]
    fn busy_interval_marks_slot_unavailable() {
        let slots = build_slots(&[iv(480, 600)], &[iv(540, 600)], 60, 60);
        assert_eq!(
            slots,
            vec![
                Slot { start: 480, end: 540, available: true },
                Slot { start: 540, end: 600, available: false },
            ]
        );
    }

    #[test]
    fn booking_ending_at_slot_start_is_not_a_conflict() {
        let slots = build_slots(&[iv(540, 600)], &[iv(480, 540)], 60, 60);
        assert!(slots[0].available);
    }

    #[test]
    fn step_larger_than_duration_leaves_gaps() {
        let slots = build_slots(&[iv(480, 720)], &[], 45, 60);
        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![480, 540, 600, 660]);
        assert!(slots.iter().all(|s| s.end - s.start == 45));
    }

    #[test]
    fn trailing_remainder_shorter_than_duration_is_dropped() {
        let slots = build_slots(&[iv(480, 590)], &[], 60, 60);
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn windows_keep_input_order() {
        let slots = build_slots(&[iv(900, 960), iv(480, 540)], &[], 60, 60);
        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![900, 480]);
    }

    #[test]
    fn zero_duration_or_step_yields_nothing() {
        assert!(build_slots(&[iv(480, 600)], &[], 0, 30).is_empty());
        assert!(build_slots(&[iv(480, 600)], &[], 30, 0).is_empty());
    }

    #[test]
    fn never_leaves_the_day() {
        let slots = build_slots(&[iv(1380, 1500)], &[], 60, 60);
        assert_eq!(slots.len(), 1);
        assert!(slots.iter().all(|s| s.end <= MINUTES_PER_DAY));
    }

    #[test]
    fn slots_fit_windows_and_flag_matches_overlap() {
        let windows = [iv(420, 700), iv(800, 1015)];
        let busy = [iv(450, 505), iv(690, 820), iv(1000, 1001)];
        for (duration, step) in [(30, 30), (45, 60), (60, 15), (50, 70)] {
            for slot in build_slots(&windows, &busy, duration, step) {
                let interval = slot.interval();
                assert_eq!(interval.len(), duration);
                assert!(windows.iter().any(|w| w.contains(&interval)));
                assert_eq!(slot.available, !overlaps_any(&interval, &busy));
            }
        }
    }

    #[test]
    fn available_slots_filters_conflicts() {
        let free = available_slots(&[iv(480, 600)], &[iv(540, 600)], 60, 60);
        assert_eq!(free, vec![iv(480, 540)]);
    }
}

//! Half-open minute intervals and interval subtraction.

use serde::{Deserialize, Serialize};

use crate::types::Minute;

/// A half-open interval `[start, end)` of minutes within one day.
///
/// An interval with `end <= start` is empty. Constructors do not reject
/// empty intervals; operations discard them where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: Minute,
    pub end: Minute,
}

impl Interval {
    pub const fn new(start: Minute, end: Minute) -> Self {
        Self { start, end }
    }

    /// Covered length in minutes (zero when empty).
    pub fn len(&self) -> Minute {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// `max(aStart, bStart) < min(aEnd, bEnd)`. Touching intervals do not
    /// overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Whether `other` lies fully inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Whether `candidate` overlaps any interval in `set`.
pub fn overlaps_any(candidate: &Interval, set: &[Interval]) -> bool {
    set.iter().any(|other| candidate.overlaps(other))
}

/// Punch every cut out of every base interval.
///
/// Cuts are applied one at a time against the current remainder list, so a
/// piece produced by an earlier cut is itself subject to later cuts. Each
/// overlapping cut leaves at most a left and a right remainder. Empty pieces
/// are dropped.
pub fn subtract(base: &[Interval], cuts: &[Interval]) -> Vec<Interval> {
    let mut remaining: Vec<Interval> = base.iter().copied().filter(|b| !b.is_empty()).collect();

    for cut in cuts.iter().filter(|c| !c.is_empty()) {
        let mut next = Vec::with_capacity(remaining.len() + 1);
        for piece in remaining {
            if !piece.overlaps(cut) {
                next.push(piece);
                continue;
            }
            let left = Interval::new(piece.start, cut.start);
            let right = Interval::new(cut.end, piece.end);
            if !left.is_empty() {
                next.push(left);
            }
            if !right.is_empty() {
                next.push(right);
            }
        }
        remaining = next;
    }

    remaining
}

/// Sum of lengths. Overlapping intervals are counted twice.
pub fn total_length(intervals: &[Interval]) -> Minute {
    intervals.iter().map(Interval::len).sum()
}

//! Minute-of-day time ranges.
//!
//! All shift times are minutes since midnight on a single calendar date.
//! Ranges are half-open `[start, end)`: a shift ending at 17:00 does not
//! overlap one starting at 17:00. Cross-midnight ranges are not modeled.

use serde::{Deserialize, Serialize};

/// Minutes since midnight (0..=1440).
pub type Minute = i32;

/// Number of minutes in a full day.
pub const MINUTES_PER_DAY: Minute = 24 * 60;

/// A time-of-day interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (inclusive).
    pub start: Minute,
    /// Interval end (exclusive).
    pub end: Minute,
}

impl TimeRange {
    /// Creates a new time range.
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { start, end }
    }

    /// Creates a range from hour/minute pairs, e.g. `from_hm(7, 15, 12, 0)`
    /// for 07:15–12:00.
    pub fn from_hm(start_h: i32, start_m: i32, end_h: i32, end_m: i32) -> Self {
        Self {
            start: start_h * 60 + start_m,
            end: end_h * 60 + end_m,
        }
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> Minute {
        self.end - self.start
    }

    /// Whether a minute falls within this range.
    #[inline]
    pub fn contains(&self, minute: Minute) -> bool {
        minute >= self.start && minute < self.end
    }

    /// Whether another range is fully contained in this one.
    pub fn contains_range(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether two ranges overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection of two ranges, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Whether the range is empty or inverted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Formats as `HH:MM-HH:MM`.
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            format_minute(self.start),
            format_minute(self.end)
        )
    }
}

/// Formats a minute-of-day as `HH:MM`.
pub fn format_minute(minute: Minute) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Merges overlapping and touching ranges into a minimal sorted set.
///
/// Empty ranges are discarded. Touching ranges (`a.end == b.start`) merge,
/// since coverage is about continuous presence.
pub fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.retain(|r| !r.is_empty());
    if ranges.is_empty() {
        return ranges;
    }
    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => {
                last.end = last.end.max(r.end);
            }
            _ => merged.push(r),
        }
    }
    merged
}

/// Subtracts a set of ranges from `base`, returning the uncovered parts
/// in ascending order.
pub fn subtract_ranges(base: TimeRange, covers: &[TimeRange]) -> Vec<TimeRange> {
    if base.is_empty() {
        return Vec::new();
    }
    let merged = merge_ranges(covers.to_vec());

    let mut gaps = Vec::new();
    let mut cursor = base.start;
    for c in &merged {
        if c.end <= cursor || c.start >= base.end {
            continue;
        }
        if c.start > cursor {
            gaps.push(TimeRange::new(cursor, c.start.min(base.end)));
        }
        cursor = cursor.max(c.end);
        if cursor >= base.end {
            break;
        }
    }
    if cursor < base.end {
        gaps.push(TimeRange::new(cursor, base.end));
    }
    gaps
}

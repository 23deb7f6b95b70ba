//! Derived shift instances.
//!
//! A `Shift` is a concrete, dated instance of a staffing slot for one
//! target week. Shifts are produced by the expander and consumed by the
//! assignment engine; they are never persisted.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::staffing::SlotRole;
use crate::time::{Minute, TimeRange};

/// Coarse time-of-day classification of a shift, derived from its start
/// time and independent of the slot's free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPart {
    /// Starts before 10:00 (opener semantics).
    Morning,
    /// Starts 10:00–14:59.
    Mid,
    /// Starts at or after 15:00 (dinner/bar semantics).
    Night,
}

/// Classifies a start time into a day part.
pub fn classify_part(start: Minute) -> DayPart {
    if start < 10 * 60 {
        DayPart::Morning
    } else if start < 15 * 60 {
        DayPart::Mid
    } else {
        DayPart::Night
    }
}

/// A concrete shift instance for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier within the generation run.
    pub id: String,
    /// Calendar date of the shift.
    pub date: NaiveDate,
    /// Weekday of `date` (denormalized for rule matching).
    pub day: Weekday,
    /// Time-of-day classification.
    pub part: DayPart,
    /// Shift time window.
    pub window: TimeRange,
    /// How many employees this shift needs (normally 1 per slot).
    pub headcount: u32,
    /// Whether this shift structurally requires a qualified bartender.
    pub requires_bartender: bool,
    /// Canonical role derived from the slot label.
    pub role: SlotRole,
    /// Original free-text slot label.
    pub label: String,
}

impl Shift {
    /// Creates a shift instance for a slot on a date.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        day: Weekday,
        window: TimeRange,
        role: SlotRole,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            day,
            part: classify_part(window.start),
            window,
            headcount: 1,
            requires_bartender: role == SlotRole::Bar,
            role,
            label: label.into(),
        }
    }

    /// Sets the required headcount.
    pub fn with_headcount(mut self, headcount: u32) -> Self {
        self.headcount = headcount;
        self
    }

    /// Shift duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> Minute {
        self.window.duration_min()
    }

    /// Whether this is an opener-labeled morning shift.
    pub fn is_opener(&self) -> bool {
        matches!(self.role, SlotRole::Opener | SlotRole::WeekendOpener)
            && self.part == DayPart::Morning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_part_thresholds() {
        assert_eq!(classify_part(7 * 60 + 15), DayPart::Morning);
        assert_eq!(classify_part(10 * 60 - 1), DayPart::Morning);
        assert_eq!(classify_part(10 * 60), DayPart::Mid);
        assert_eq!(classify_part(15 * 60 - 1), DayPart::Mid);
        assert_eq!(classify_part(15 * 60), DayPart::Night);
        assert_eq!(classify_part(21 * 60), DayPart::Night);
    }

    #[test]
    fn test_shift_derivation() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let s = Shift::new(
            "tue-opener",
            date,
            Weekday::Tue,
            TimeRange::from_hm(7, 15, 12, 0),
            SlotRole::Opener,
            "Opener",
        );
        assert_eq!(s.part, DayPart::Morning);
        assert_eq!(s.headcount, 1);
        assert!(!s.requires_bartender);
        assert!(s.is_opener());
        assert_eq!(s.duration_min(), 285);
    }

    #[test]
    fn test_bar_shift_requires_bartender() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        let s = Shift::new(
            "fri-bar",
            date,
            Weekday::Fri,
            TimeRange::from_hm(16, 0, 22, 0),
            SlotRole::Bar,
            "Bar",
        );
        assert!(s.requires_bartender);
        assert_eq!(s.part, DayPart::Night);
        assert!(!s.is_opener());
    }

    #[test]
    fn test_night_opener_label_is_not_opener() {
        // Opener role but a night start → opener affinity does not apply
        let date = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        let s = Shift::new(
            "odd",
            date,
            Weekday::Fri,
            TimeRange::from_hm(17, 0, 21, 0),
            SlotRole::Opener,
            "Opener",
        );
        assert!(!s.is_opener());
    }
}

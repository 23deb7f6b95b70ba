//! Employee model.
//!
//! An employee carries everything the evaluator needs to answer "can this
//! person work this shift": skill scales, weekly availability, date-range
//! exclusions, recurring time-of-day restrictions, and permanent rules.
//! Inactive employees are excluded from all scheduling.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::shift::DayPart;
use super::staffing::SlotRole;
use crate::time::{Minute, TimeRange};

/// An employee on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Bartending skill rating (0–5). At or above the configured threshold
    /// the employee counts as a qualified bartender.
    pub bartending_scale: u8,
    /// Rating for working without supervision (0–5).
    pub alone_scale: u8,
    /// Per-weekday availability. Missing days are unavailable.
    pub availability: WeekAvailability,
    /// Closed date ranges (vacations, leaves).
    pub exclusions: Vec<Exclusion>,
    /// Recurring time-of-day limits.
    pub restrictions: Vec<EmployeeRestriction>,
    /// Recurring week-independent rules.
    pub permanent_rules: Vec<PermanentRule>,
    /// Minimum shifts per week, if declared.
    pub min_shifts_per_week: Option<u32>,
    /// Free-form role tags.
    pub roles: Vec<String>,
    /// Whether the employee can open the restaurant.
    pub can_open: bool,
    /// Days the opener affinity explicitly applies to. Empty = any day.
    pub open_days: Vec<Weekday>,
    /// Preferred day part, if declared.
    pub part_preference: Option<DayPart>,
    /// Explicit "needs a bartender on shift" flag, independent of skill.
    pub needs_bartender: bool,
    /// Inactive employees are excluded from all scheduling.
    pub active: bool,
}

impl Employee {
    /// Creates an active employee with no availability declared.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bartending_scale: 0,
            alone_scale: 0,
            availability: WeekAvailability::default(),
            exclusions: Vec::new(),
            restrictions: Vec::new(),
            permanent_rules: Vec::new(),
            min_shifts_per_week: None,
            roles: Vec::new(),
            can_open: false,
            open_days: Vec::new(),
            part_preference: None,
            needs_bartender: false,
            active: true,
        }
    }

    /// Sets the skill scales (clamped to 0–5).
    pub fn with_scales(mut self, bartending: u8, alone: u8) -> Self {
        self.bartending_scale = bartending.min(5);
        self.alone_scale = alone.min(5);
        self
    }

    /// Declares availability for a weekday.
    pub fn with_day(mut self, day: Weekday, availability: DayAvailability) -> Self {
        self.availability.days.insert(day, availability);
        self
    }

    /// Adds a date-range exclusion.
    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Adds a recurring restriction.
    pub fn with_restriction(mut self, restriction: EmployeeRestriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Adds a permanent rule.
    pub fn with_permanent_rule(mut self, rule: PermanentRule) -> Self {
        self.permanent_rules.push(rule);
        self
    }

    /// Declares a weekly minimum shift count.
    pub fn with_min_shifts(mut self, min: u32) -> Self {
        self.min_shifts_per_week = Some(min);
        self
    }

    /// Adds a role tag.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Marks the employee as an opener, optionally for specific days only.
    pub fn with_can_open(mut self, days: Vec<Weekday>) -> Self {
        self.can_open = true;
        self.open_days = days;
        self
    }

    /// Declares a day-part preference.
    pub fn with_part_preference(mut self, part: DayPart) -> Self {
        self.part_preference = Some(part);
        self
    }

    /// Flags the employee as needing a bartender on shift.
    pub fn with_needs_bartender(mut self) -> Self {
        self.needs_bartender = true;
        self
    }

    /// Marks the employee inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether any exclusion covers the date.
    pub fn excluded_on(&self, date: NaiveDate) -> bool {
        self.exclusions.iter().any(|e| e.contains(date))
    }

    /// Whether the opener affinity applies on a day. Explicit day lists
    /// win over the generic flag.
    pub fn opens_on(&self, day: Weekday) -> bool {
        self.can_open && (self.open_days.is_empty() || self.open_days.contains(&day))
    }

    /// Active fixed-shift window for a day, if one exists.
    pub fn fixed_shift_on(&self, day: Weekday) -> Option<TimeRange> {
        self.permanent_rules.iter().find_map(|r| match &r.kind {
            PermanentRuleKind::FixedShift(window) if r.active && r.applies_on(day) => Some(*window),
            _ => None,
        })
    }
}

/// Weekly availability: one entry per declared weekday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekAvailability {
    /// Declared days. A day with no entry is unavailable.
    pub days: HashMap<Weekday, DayAvailability>,
}

impl WeekAvailability {
    /// Returns the availability for a day (missing = unavailable).
    pub fn for_day(&self, day: Weekday) -> &DayAvailability {
        self.days.get(&day).unwrap_or(&DayAvailability::Unavailable)
    }
}

/// Availability for a single weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DayAvailability {
    /// Not available at all that day.
    Unavailable,
    /// Available for shifts matching at least one entry.
    Slots(Vec<AvailabilitySlot>),
}

impl DayAvailability {
    /// Available for any shift, no time bounds.
    pub fn any() -> Self {
        Self::Slots(vec![AvailabilitySlot::new(BucketPref::Any)])
    }

    /// Whether any entry covers a candidate shift.
    pub fn covers(&self, part: DayPart, role: SlotRole, window: TimeRange) -> bool {
        match self {
            Self::Unavailable => false,
            Self::Slots(slots) => slots.iter().any(|s| s.covers(part, role, window)),
        }
    }
}

/// One acceptable shift bucket within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// Which kind of shift this entry accepts.
    pub bucket: BucketPref,
    /// Earliest acceptable start, if bounded.
    pub earliest_start: Option<Minute>,
    /// Latest acceptable end, if bounded.
    pub latest_end: Option<Minute>,
}

impl AvailabilitySlot {
    /// Creates an unbounded entry for a bucket.
    pub fn new(bucket: BucketPref) -> Self {
        Self {
            bucket,
            earliest_start: None,
            latest_end: None,
        }
    }

    /// Bounds the earliest acceptable start.
    pub fn with_earliest_start(mut self, minute: Minute) -> Self {
        self.earliest_start = Some(minute);
        self
    }

    /// Bounds the latest acceptable end.
    pub fn with_latest_end(mut self, minute: Minute) -> Self {
        self.latest_end = Some(minute);
        self
    }

    /// Whether this entry covers a candidate shift.
    pub fn covers(&self, part: DayPart, role: SlotRole, window: TimeRange) -> bool {
        let bucket_ok = match &self.bucket {
            BucketPref::Any => true,
            BucketPref::Morning => part == DayPart::Morning,
            BucketPref::Mid => part == DayPart::Mid,
            BucketPref::Night => part == DayPart::Night,
            BucketPref::Bar => role == SlotRole::Bar,
            BucketPref::Custom(range) => range.contains_range(&window),
        };
        if !bucket_ok {
            return false;
        }
        if let Some(earliest) = self.earliest_start {
            if window.start < earliest {
                return false;
            }
        }
        if let Some(latest) = self.latest_end {
            if window.end > latest {
                return false;
            }
        }
        true
    }
}

/// Shift bucket an availability entry accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BucketPref {
    /// Morning shifts.
    Morning,
    /// Mid shifts.
    Mid,
    /// Night shifts.
    Night,
    /// Bar shifts (by role, not by day part).
    Bar,
    /// Any shift type.
    Any,
    /// Only shifts fully inside this window.
    Custom(TimeRange),
}

/// A closed date range (inclusive on both ends).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    /// First excluded date.
    pub start: NaiveDate,
    /// Last excluded date.
    pub end: NaiveDate,
    /// Optional reason shown in diagnostics.
    pub reason: Option<String>,
}

impl Exclusion {
    /// Creates an exclusion range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            reason: None,
        }
    }

    /// Single-day exclusion.
    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Attaches a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether the date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A recurring time-of-day restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRestriction {
    /// What the restriction forbids.
    pub kind: RestrictionKind,
    /// Days the restriction applies to. Empty = every working day.
    pub days: Vec<Weekday>,
}

/// Kinds of recurring restrictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RestrictionKind {
    /// Cannot start before this minute.
    NoStartBefore(Minute),
    /// Cannot work past this minute.
    NoWorkAfter(Minute),
    /// Cannot work during this range at all.
    UnavailableRange(TimeRange),
}

impl EmployeeRestriction {
    /// No shift may start before `minute` on the given days.
    pub fn no_start_before(minute: Minute, days: Vec<Weekday>) -> Self {
        Self {
            kind: RestrictionKind::NoStartBefore(minute),
            days,
        }
    }

    /// No shift may run past `minute` on the given days.
    pub fn no_work_after(minute: Minute, days: Vec<Weekday>) -> Self {
        Self {
            kind: RestrictionKind::NoWorkAfter(minute),
            days,
        }
    }

    /// No shift may overlap `range` on the given days.
    pub fn unavailable_range(range: TimeRange, days: Vec<Weekday>) -> Self {
        Self {
            kind: RestrictionKind::UnavailableRange(range),
            days,
        }
    }

    /// Whether the restriction applies on a day.
    pub fn applies_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    /// Whether a candidate window violates this restriction.
    pub fn blocks(&self, window: TimeRange) -> bool {
        match &self.kind {
            RestrictionKind::NoStartBefore(m) => window.start < *m,
            RestrictionKind::NoWorkAfter(m) => window.end > *m,
            RestrictionKind::UnavailableRange(r) => window.overlaps(r),
        }
    }
}

/// A recurring week-independent rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentRule {
    /// What the rule prescribes.
    pub kind: PermanentRuleKind,
    /// Days the rule applies to. Empty = every working day.
    /// Fixed-shift rules commonly span several weekdays.
    pub days: Vec<Weekday>,
    /// Inactive rules are ignored entirely.
    pub active: bool,
}

/// Kinds of permanent rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PermanentRuleKind {
    /// Always work exactly this window on the rule's days.
    FixedShift(TimeRange),
    /// Only schedulable fully inside this window.
    OnlyAvailable(TimeRange),
    /// Never schedule on the rule's days.
    NeverSchedule,
}

impl PermanentRule {
    /// Creates an active fixed-shift rule.
    pub fn fixed_shift(window: TimeRange, days: Vec<Weekday>) -> Self {
        Self {
            kind: PermanentRuleKind::FixedShift(window),
            days,
            active: true,
        }
    }

    /// Creates an active only-available rule.
    pub fn only_available(window: TimeRange, days: Vec<Weekday>) -> Self {
        Self {
            kind: PermanentRuleKind::OnlyAvailable(window),
            days,
            active: true,
        }
    }

    /// Creates an active never-schedule rule.
    pub fn never_schedule(days: Vec<Weekday>) -> Self {
        Self {
            kind: PermanentRuleKind::NeverSchedule,
            days,
            active: true,
        }
    }

    /// Toggles the rule inactive.
    pub fn disabled(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether the rule applies on a day (inactive rules never apply).
    pub fn applies_on(&self, day: Weekday) -> bool {
        self.active && (self.days.is_empty() || self.days.contains(&day))
    }
}

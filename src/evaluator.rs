//! Constraint evaluator.
//!
//! Pure predicate answering "can employee E work candidate shift S on
//! date D?". Checks run in a fixed order and the first failure wins, so
//! a denial reason is always the highest-precedence one. The evaluator
//! never mutates anything; callers own the assignment set.
//!
//! Check order:
//! 1. date exclusion
//! 2. explicit exclude override (outranks every other rule source)
//! 3. overlap with an existing same-day assignment
//! 4. recurring restriction
//! 5. permanent rule (never-schedule / only-available; fixed-shift only
//!    signals a window substitution)
//! 6. minimum shift duration for non-bartenders
//! 7. weekly availability (skipped for forced placements)

use chrono::{NaiveDate, Weekday};

use crate::models::{
    classify_part, DayPart, Employee, EngineConfig, OverrideKind, PermanentRuleKind,
    ScheduleAssignment, ScheduleOverride, Shift, SlotRole,
};
use crate::time::TimeRange;

/// A candidate placement under evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftCandidate {
    /// Weekday of the placement.
    pub day: Weekday,
    /// Date of the placement.
    pub date: NaiveDate,
    /// Day part (derived from the window start).
    pub part: DayPart,
    /// Canonical role of the underlying slot.
    pub role: SlotRole,
    /// Candidate time window.
    pub window: TimeRange,
}

impl ShiftCandidate {
    /// Builds a candidate from a window, deriving the day part.
    pub fn new(day: Weekday, date: NaiveDate, role: SlotRole, window: TimeRange) -> Self {
        Self {
            day,
            date,
            part: classify_part(window.start),
            role,
            window,
        }
    }

    /// Builds a candidate for an expanded shift.
    pub fn from_shift(shift: &Shift) -> Self {
        Self {
            day: shift.day,
            date: shift.date,
            part: shift.part,
            role: shift.role,
            window: shift.window,
        }
    }

    /// Same candidate with a substituted window (day part re-derived).
    pub fn with_window(mut self, window: TimeRange) -> Self {
        self.window = window;
        self.part = classify_part(window.start);
        self
    }
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The employee is inactive.
    Inactive,
    /// The date falls inside an exclusion range.
    DateExcluded,
    /// A matching exclude override blocks the placement.
    ExcludeOverride,
    /// The window overlaps an existing assignment that day.
    Overlap,
    /// A recurring restriction forbids the window.
    Restriction,
    /// A never-schedule permanent rule covers the day.
    NeverScheduled,
    /// The window is not fully inside an only-available rule.
    OutsideOnlyAvailable,
    /// Non-bartender placed in a shift below the minimum duration.
    BelowMinimumDuration,
    /// No availability entry covers the candidate.
    Unavailable,
}

impl Denial {
    /// Short human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Inactive => "employee is inactive",
            Self::DateExcluded => "date is excluded",
            Self::ExcludeOverride => "excluded by override",
            Self::Overlap => "overlaps an existing shift",
            Self::Restriction => "violates a time restriction",
            Self::NeverScheduled => "never scheduled on this day",
            Self::OutsideOnlyAvailable => "outside the only-available window",
            Self::BelowMinimumDuration => "shift is below the minimum duration",
            Self::Unavailable => "not available for this shift",
        }
    }
}

/// Evaluation verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Placement is allowed. When a fixed-shift rule applies to the day,
    /// `fixed_window` carries the window the caller must substitute.
    Allowed {
        /// Fixed-shift window to substitute, if any.
        fixed_window: Option<TimeRange>,
    },
    /// Placement is blocked.
    Blocked(Denial),
}

impl Evaluation {
    /// Whether the placement is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Fixed-shift window to substitute, if allowed and signalled.
    pub fn fixed_window(&self) -> Option<TimeRange> {
        match self {
            Self::Allowed { fixed_window } => *fixed_window,
            Self::Blocked(_) => None,
        }
    }
}

/// Full evaluation, all seven checks.
pub fn can_assign(
    employee: &Employee,
    candidate: &ShiftCandidate,
    existing: &[ScheduleAssignment],
    overrides: &[ScheduleOverride],
    cfg: &EngineConfig,
) -> Evaluation {
    evaluate(employee, candidate, existing, overrides, cfg, true)
}

/// Forced-placement evaluation: skips only the weekly-availability check.
/// Used by assign and custom-time overrides.
pub fn can_assign_forced(
    employee: &Employee,
    candidate: &ShiftCandidate,
    existing: &[ScheduleAssignment],
    overrides: &[ScheduleOverride],
    cfg: &EngineConfig,
) -> Evaluation {
    evaluate(employee, candidate, existing, overrides, cfg, false)
}

fn evaluate(
    employee: &Employee,
    candidate: &ShiftCandidate,
    existing: &[ScheduleAssignment],
    overrides: &[ScheduleOverride],
    cfg: &EngineConfig,
    check_availability: bool,
) -> Evaluation {
    if !employee.active {
        return Evaluation::Blocked(Denial::Inactive);
    }

    // 1. Date exclusion
    if employee.excluded_on(candidate.date) {
        return Evaluation::Blocked(Denial::DateExcluded);
    }

    // 2. Exclude override
    let excluded = overrides.iter().any(|o| {
        o.kind == OverrideKind::Exclude
            && o.day == candidate.day
            && o.covers_employee(&employee.id)
            && o.filter.matches(candidate.part)
    });
    if excluded {
        return Evaluation::Blocked(Denial::ExcludeOverride);
    }

    // 3. Overlap with existing assignments
    let overlaps = existing.iter().any(|a| {
        a.employee_id == employee.id && a.date == candidate.date && a.window.overlaps(&candidate.window)
    });
    if overlaps {
        return Evaluation::Blocked(Denial::Overlap);
    }

    // 4. Restrictions
    let restricted = employee
        .restrictions
        .iter()
        .any(|r| r.applies_on(candidate.day) && r.blocks(candidate.window));
    if restricted {
        return Evaluation::Blocked(Denial::Restriction);
    }

    // 5. Permanent rules
    let mut fixed_window = None;
    for rule in &employee.permanent_rules {
        if !rule.applies_on(candidate.day) {
            continue;
        }
        match &rule.kind {
            PermanentRuleKind::NeverSchedule => {
                return Evaluation::Blocked(Denial::NeverScheduled);
            }
            PermanentRuleKind::OnlyAvailable(window) => {
                if !window.contains_range(&candidate.window) {
                    return Evaluation::Blocked(Denial::OutsideOnlyAvailable);
                }
            }
            PermanentRuleKind::FixedShift(window) => {
                fixed_window = Some(*window);
            }
        }
    }

    // 6. Minimum shift duration for non-bartenders
    if !cfg.is_bartender(employee.bartending_scale)
        && candidate.window.duration_min() < cfg.min_shift_min
    {
        return Evaluation::Blocked(Denial::BelowMinimumDuration);
    }

    // 7. Weekly availability
    if check_availability
        && !employee
            .availability
            .for_day(candidate.day)
            .covers(candidate.part, candidate.role, candidate.window)
    {
        return Evaluation::Blocked(Denial::Unavailable);
    }

    Evaluation::Allowed { fixed_window }
}

//! Generation results.
//!
//! The `WeeklySchedule` is the only externally visible artifact of a run:
//! assignments plus the conflicts and warnings gathered along the way.
//! Consumers must not mutate it; corrections go through regeneration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{Minute, TimeRange};

/// Which precedence tier produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    /// Pinned from a prior run.
    Locked,
    /// A fixed-shift permanent rule.
    FixedRule,
    /// A forced assign or custom-time override.
    Override,
    /// The greedy fill pass.
    Fill,
    /// A synthetic bartender-coverage shift.
    Coverage,
}

/// One employee working one shift on one date.
///
/// Unique per (employee, date, shift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    /// Shift the assignment fills.
    pub shift_id: String,
    /// Assigned employee.
    pub employee_id: String,
    /// Calendar date worked.
    pub date: NaiveDate,
    /// Worked window, possibly narrower than the shift's.
    pub window: TimeRange,
    /// Which tier produced this assignment.
    pub source: AssignmentSource,
}

impl ScheduleAssignment {
    /// Creates an assignment.
    pub fn new(
        shift_id: impl Into<String>,
        employee_id: impl Into<String>,
        date: NaiveDate,
        window: TimeRange,
        source: AssignmentSource,
    ) -> Self {
        Self {
            shift_id: shift_id.into(),
            employee_id: employee_id.into(),
            date,
            window,
            source,
        }
    }

    /// Worked minutes.
    #[inline]
    pub fn duration_min(&self) -> Minute {
        self.window.duration_min()
    }
}

/// Conflict classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A staffing slot could not be filled to its headcount.
    NoCoverage,
    /// A supervision gap had no available qualified bartender.
    NoBartender,
    /// An override could not be honored by the final schedule.
    RuleViolation,
}

/// A blocking-quality problem the schedule surfaces but does not hide.
///
/// Conflicts never abort generation; the schedule is returned usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    /// Conflict classification.
    pub kind: ConflictKind,
    /// Date the conflict concerns, if date-specific.
    pub date: Option<NaiveDate>,
    /// Shift involved, if any.
    pub shift_id: Option<String>,
    /// Employee involved, if any.
    pub employee_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl ScheduleConflict {
    /// An understaffed slot.
    pub fn no_coverage(
        date: NaiveDate,
        shift_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConflictKind::NoCoverage,
            date: Some(date),
            shift_id: Some(shift_id.into()),
            employee_id: None,
            message: message.into(),
        }
    }

    /// A supervision gap without bartender coverage.
    pub fn no_bartender(
        date: NaiveDate,
        employee_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConflictKind::NoBartender,
            date: Some(date),
            shift_id: None,
            employee_id: Some(employee_id.into()),
            message: message.into(),
        }
    }

    /// An override the final schedule does not satisfy.
    pub fn rule_violation(employee_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::RuleViolation,
            date: None,
            shift_id: None,
            employee_id: Some(employee_id.into()),
            message: message.into(),
        }
    }
}

/// Warning classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A day was skipped because the business is closed.
    BusinessClosed,
    /// A day's slots were shortened by an early close.
    EarlyClose,
    /// A locked shift could not be re-admitted.
    LockDropped,
    /// A synthetic coverage shift was scheduled.
    CoverageNeeded,
    /// An employee is under their declared weekly minimum.
    UnderMinimumShifts,
    /// An employee is at or approaching the overtime threshold.
    ApproachingOvertime,
    /// Consecutive-day shifts leave less than the configured rest gap.
    InsufficientRest,
}

/// Informational note attached to the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    /// Warning classification.
    pub kind: WarningKind,
    /// Employee involved, if any.
    pub employee_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl ScheduleWarning {
    /// Creates a business-wide warning.
    pub fn business(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            employee_id: None,
            message: message.into(),
        }
    }

    /// Creates an employee-scoped warning.
    pub fn employee(
        kind: WarningKind,
        employee_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            employee_id: Some(employee_id.into()),
            message: message.into(),
        }
    }
}

/// The complete result of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// Monday of the generated week.
    pub week_start: Option<NaiveDate>,
    /// All assignments, in generation order.
    pub assignments: Vec<ScheduleAssignment>,
    /// Problems worth human review.
    pub conflicts: Vec<ScheduleConflict>,
    /// Informational notes.
    pub warnings: Vec<ScheduleWarning>,
}

impl WeeklySchedule {
    /// Creates an empty schedule for a week.
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start: Some(week_start),
            ..Self::default()
        }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: ScheduleAssignment) {
        self.assignments.push(assignment);
    }

    /// Adds a conflict.
    pub fn add_conflict(&mut self, conflict: ScheduleConflict) {
        self.conflicts.push(conflict);
    }

    /// Adds a warning.
    pub fn add_warning(&mut self, warning: ScheduleWarning) {
        self.warnings.push(warning);
    }

    /// All assignments for an employee.
    pub fn assignments_for_employee(&self, employee_id: &str) -> Vec<&ScheduleAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .collect()
    }

    /// All assignments for an employee on one date.
    pub fn assignments_on(&self, employee_id: &str, date: NaiveDate) -> Vec<&ScheduleAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.employee_id == employee_id && a.date == date)
            .collect()
    }

    /// All assignments on one date.
    pub fn assignments_for_date(&self, date: NaiveDate) -> Vec<&ScheduleAssignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Total worked minutes for an employee across the week.
    pub fn weekly_minutes(&self, employee_id: &str) -> Minute {
        self.assignments_for_employee(employee_id)
            .iter()
            .map(|a| a.duration_min())
            .sum()
    }

    /// Number of shifts for an employee across the week.
    pub fn shift_count(&self, employee_id: &str) -> usize {
        self.assignments_for_employee(employee_id).len()
    }

    /// Whether an employee already holds an assignment overlapping a window
    /// on a date.
    pub fn has_overlap(&self, employee_id: &str, date: NaiveDate, window: TimeRange) -> bool {
        self.assignments
            .iter()
            .any(|a| a.employee_id == employee_id && a.date == date && a.window.overlaps(&window))
    }

    /// Number of assignments filling a shift.
    pub fn filled_count(&self, shift_id: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .count()
    }
}

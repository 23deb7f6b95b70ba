//! Manager-entered schedule overrides.
//!
//! Overrides arrive from an external instruction translator; the engine
//! only relies on well-formed day/kind/scope/time fields. Business-wide
//! directives use sentinel scopes: an "all employees" exclude closes the
//! day, and a "close early" scope shortens it.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::shift::DayPart;
use crate::time::Minute;

/// What the override directs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideKind {
    /// Force the employee onto a matching shift.
    Assign,
    /// Keep the employee off matching shifts. Outranks every other source.
    Exclude,
    /// Rank the employee first among candidates for matching shifts.
    Prioritize,
    /// Force a placement with explicit (possibly partial) times.
    CustomTime,
}

/// Who the override applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideScope {
    /// One employee by id.
    Employee(String),
    /// Business-wide sentinel: with `Exclude` this closes the day.
    AllEmployees,
    /// Business-wide sentinel: the day closes early at the override's end time.
    CloseEarly,
}

/// Which shifts the override targets within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftFilter {
    /// Any shift on the day.
    Any,
    /// Only shifts of one day part.
    Part(DayPart),
}

impl ShiftFilter {
    /// Whether a shift's day part matches this filter.
    pub fn matches(&self, part: DayPart) -> bool {
        match self {
            Self::Any => true,
            Self::Part(p) => *p == part,
        }
    }
}

/// A manager-authored directive scoped to one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    /// Directive type.
    pub kind: OverrideKind,
    /// Target employee or business-wide sentinel.
    pub scope: OverrideScope,
    /// Weekday the directive applies to.
    pub day: Weekday,
    /// Shift-type filter within the day.
    pub filter: ShiftFilter,
    /// Explicit start, for custom-time directives.
    pub start: Option<Minute>,
    /// Explicit end, for custom-time and close-early directives.
    pub end: Option<Minute>,
}

impl ScheduleOverride {
    /// Forces an employee onto a matching shift.
    pub fn assign(employee_id: impl Into<String>, day: Weekday, filter: ShiftFilter) -> Self {
        Self {
            kind: OverrideKind::Assign,
            scope: OverrideScope::Employee(employee_id.into()),
            day,
            filter,
            start: None,
            end: None,
        }
    }

    /// Keeps an employee off matching shifts.
    pub fn exclude(employee_id: impl Into<String>, day: Weekday, filter: ShiftFilter) -> Self {
        Self {
            kind: OverrideKind::Exclude,
            scope: OverrideScope::Employee(employee_id.into()),
            day,
            filter,
            start: None,
            end: None,
        }
    }

    /// Ranks an employee first for matching shifts.
    pub fn prioritize(employee_id: impl Into<String>, day: Weekday, filter: ShiftFilter) -> Self {
        Self {
            kind: OverrideKind::Prioritize,
            scope: OverrideScope::Employee(employee_id.into()),
            day,
            filter,
            start: None,
            end: None,
        }
    }

    /// Forces a placement with explicit times. Either bound may be absent
    /// ("starts at 10am" / "leaves at 1pm").
    pub fn custom_time(
        employee_id: impl Into<String>,
        day: Weekday,
        filter: ShiftFilter,
        start: Option<Minute>,
        end: Option<Minute>,
    ) -> Self {
        Self {
            kind: OverrideKind::CustomTime,
            scope: OverrideScope::Employee(employee_id.into()),
            day,
            filter,
            start,
            end,
        }
    }

    /// Closes the business for the whole day.
    pub fn close_day(day: Weekday) -> Self {
        Self {
            kind: OverrideKind::Exclude,
            scope: OverrideScope::AllEmployees,
            day,
            filter: ShiftFilter::Any,
            start: None,
            end: None,
        }
    }

    /// Closes the business early at `close` on the day.
    pub fn close_early(day: Weekday, close: Minute) -> Self {
        Self {
            kind: OverrideKind::CustomTime,
            scope: OverrideScope::CloseEarly,
            day,
            filter: ShiftFilter::Any,
            start: None,
            end: Some(close),
        }
    }

    /// Whether this is the business-wide closed-day sentinel for `day`.
    pub fn closes_day(&self, day: Weekday) -> bool {
        self.day == day
            && self.kind == OverrideKind::Exclude
            && self.scope == OverrideScope::AllEmployees
            && self.filter == ShiftFilter::Any
    }

    /// Early-close time for `day`, if this is the close-early sentinel.
    pub fn early_close_for(&self, day: Weekday) -> Option<Minute> {
        if self.day == day && self.scope == OverrideScope::CloseEarly {
            self.end
        } else {
            None
        }
    }

    /// Whether the override is scoped to the employee (directly or via the
    /// all-employees sentinel).
    pub fn covers_employee(&self, employee_id: &str) -> bool {
        match &self.scope {
            OverrideScope::Employee(id) => id == employee_id,
            OverrideScope::AllEmployees => true,
            OverrideScope::CloseEarly => false,
        }
    }

    /// Employee id for employee-scoped overrides.
    pub fn employee_id(&self) -> Option<&str> {
        match &self.scope {
            OverrideScope::Employee(id) => Some(id),
            _ => None,
        }
    }
}

/// Finds the business closed-day override for a day, if any.
pub fn closed_day<'a>(
    overrides: &'a [ScheduleOverride],
    day: Weekday,
) -> Option<&'a ScheduleOverride> {
    overrides.iter().find(|o| o.closes_day(day))
}

/// Finds the early-close time for a day, if any.
pub fn early_close(overrides: &[ScheduleOverride], day: Weekday) -> Option<Minute> {
    overrides.iter().find_map(|o| o.early_close_for(day))
}

//! Weekly schedule generation.
//!
//! The pipeline runs four stages over one week's inputs: template
//! expansion, precedence resolution with greedy fill, bartender coverage
//! gap-filling, and the consistency/reporting sweep. Generation is a
//! single synchronous computation with no shared state; identical inputs
//! produce identical output.

mod coverage;
mod ranking;
mod report;
mod resolver;

use chrono::NaiveDate;

use crate::expand::{expand_week, week_monday};
use crate::models::{
    Employee, EngineConfig, ScheduleAssignment, ScheduleOverride, StaffingShape, WeeklySchedule,
};

/// Input container for one generation run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Employee roster, in stable input order (the final ranking tie-break).
    pub employees: Vec<Employee>,
    /// Staffing demand, either input shape.
    pub staffing: StaffingShape,
    /// Manager overrides for the week.
    pub overrides: Vec<ScheduleOverride>,
    /// Assignments pinned from a prior run.
    pub locked: Vec<ScheduleAssignment>,
    /// Any date inside the target week; normalized to its Monday.
    pub week_start: NaiveDate,
    /// Engine tunables.
    pub config: EngineConfig,
}

impl ScheduleRequest {
    /// Creates a request with no overrides or locks and default tunables.
    pub fn new(employees: Vec<Employee>, staffing: StaffingShape, week_start: NaiveDate) -> Self {
        Self {
            employees,
            staffing,
            overrides: Vec::new(),
            locked: Vec::new(),
            week_start,
            config: EngineConfig::default(),
        }
    }

    /// Sets the week's overrides.
    pub fn with_overrides(mut self, overrides: Vec<ScheduleOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the locked assignments.
    pub fn with_locked(mut self, locked: Vec<ScheduleAssignment>) -> Self {
        self.locked = locked;
        self
    }

    /// Sets the engine tunables.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Deterministic weekly schedule generator.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use shift_roster::engine::{ScheduleRequest, WeeklyScheduler};
/// use shift_roster::models::{
///     DayAvailability, DayStaffing, Employee, StaffingShape, StaffingSlot, WeeklyStaffingNeeds,
/// };
/// use shift_roster::time::TimeRange;
///
/// let employees = vec![Employee::new("ada", "Ada")
///     .with_scales(3, 3)
///     .with_day(Weekday::Tue, DayAvailability::any())];
/// let staffing = StaffingShape::Slots(WeeklyStaffingNeeds::new().with_day(
///     DayStaffing::new(Weekday::Tue).with_slot(StaffingSlot::new(
///         "tue-opener",
///         TimeRange::from_hm(7, 15, 12, 0),
///         "Opener",
///     )),
/// ));
/// let week = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let schedule = WeeklyScheduler::new().generate(&ScheduleRequest::new(employees, staffing, week));
/// assert_eq!(schedule.assignments.len(), 1);
/// assert_eq!(schedule.assignments[0].employee_id, "ada");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeeklyScheduler;

impl WeeklyScheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Generates the schedule for the week of `request.week_start`.
    ///
    /// Never fails: problems surface as conflicts and warnings on the
    /// returned schedule.
    pub fn generate(&self, request: &ScheduleRequest) -> WeeklySchedule {
        let monday = week_monday(request.week_start);
        let expansion = expand_week(request.staffing.clone(), &request.overrides, monday);

        let mut schedule = resolver::resolve(
            monday,
            &request.employees,
            &request.overrides,
            &expansion.shifts,
            &request.locked,
            &request.config,
        );
        for warning in expansion.warnings {
            schedule.add_warning(warning);
        }

        coverage::fill_bartender_gaps(
            &mut schedule,
            &request.employees,
            &request.overrides,
            &request.config,
        );
        report::finalize(
            &mut schedule,
            &request.employees,
            &request.overrides,
            &request.config,
        );

        schedule
    }
}

//! Domain models for weekly shift rostering.
//!
//! Supply side ([`Employee`] with availability, exclusions, restrictions,
//! permanent rules), demand side ([`WeeklyStaffingNeeds`] /
//! [`StaffingShape`]), manager directives ([`ScheduleOverride`]), derived
//! [`Shift`] instances, and the [`WeeklySchedule`] result.

pub mod config;
pub mod employee;
pub mod overrides;
pub mod schedule;
pub mod shift;
pub mod staffing;

pub use config::EngineConfig;
pub use employee::{
    AvailabilitySlot, BucketPref, DayAvailability, Employee, EmployeeRestriction, Exclusion,
    PermanentRule, PermanentRuleKind, RestrictionKind, WeekAvailability,
};
pub use overrides::{OverrideKind, OverrideScope, ScheduleOverride, ShiftFilter};
pub use schedule::{
    AssignmentSource, ConflictKind, ScheduleAssignment, ScheduleConflict, ScheduleWarning,
    WarningKind, WeeklySchedule,
};
pub use shift::{classify_part, DayPart, Shift};
pub use staffing::{
    normalize_label, weekday_key, DayStaffing, LegacyDayStaffing, SlotRole, StaffingShape,
    StaffingSlot, WeeklyStaffingNeeds, OPEN_DAYS,
};

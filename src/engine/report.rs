//! Consistency and reporting pass.
//!
//! Final sweep over the assignment set: enforce closed-day and
//! early-close truncation as a safety net, verify every employee-scoped
//! override against the result, and append the load warnings (minimum
//! weekly shifts, overtime, rest between consecutive days). Diagnostics
//! never retract the schedule.

use chrono::{Datelike, Weekday};

use crate::expand::date_for;
use crate::models::overrides::{closed_day, early_close};
use crate::models::{
    classify_part, weekday_key, Employee, EngineConfig, OverrideKind, ScheduleConflict,
    ScheduleOverride, ScheduleWarning, WarningKind, WeeklySchedule,
};
use crate::time::{format_minute, MINUTES_PER_DAY};

/// Runs the full consistency and reporting sweep.
pub fn finalize(
    schedule: &mut WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    cfg: &EngineConfig,
) {
    enforce_business_hours(schedule, overrides);
    verify_overrides(schedule, overrides);
    load_warnings(schedule, employees, cfg);
}

/// Drops closed-day assignments and truncates past an early close.
fn enforce_business_hours(schedule: &mut WeeklySchedule, overrides: &[ScheduleOverride]) {
    schedule.assignments.retain_mut(|a| {
        let day = a.date.weekday();
        if day == Weekday::Mon || closed_day(overrides, day).is_some() {
            return false;
        }
        if let Some(close) = early_close(overrides, day) {
            if a.window.start >= close {
                return false;
            }
            if a.window.end > close {
                a.window.end = close;
            }
        }
        true
    });
}

/// Appends a `rule_violation` conflict for every employee-scoped override
/// the final assignment set does not satisfy.
fn verify_overrides(schedule: &mut WeeklySchedule, overrides: &[ScheduleOverride]) {
    let Some(week_start) = schedule.week_start else {
        return;
    };

    for o in overrides {
        let Some(employee_id) = o.employee_id() else {
            continue;
        };
        let date = date_for(week_start, o.day);
        let matched = schedule.assignments.iter().any(|a| {
            a.employee_id == employee_id
                && a.date == date
                && o.filter.matches(classify_part(a.window.start))
        });

        let violation = match o.kind {
            OverrideKind::Exclude => matched.then(|| {
                format!(
                    "{} is assigned on {} despite an exclude override",
                    employee_id,
                    weekday_key(o.day)
                )
            }),
            OverrideKind::Assign | OverrideKind::CustomTime => (!matched).then(|| {
                format!(
                    "{} has no matching assignment on {} for a forced override",
                    employee_id,
                    weekday_key(o.day)
                )
            }),
            // Prioritize is a ranking hint, nothing to verify
            OverrideKind::Prioritize => None,
        };

        if let Some(message) = violation {
            schedule.add_conflict(ScheduleConflict::rule_violation(employee_id, message));
        }
    }
}

/// Minimum-shift, overtime, and rest warnings per employee.
fn load_warnings(schedule: &mut WeeklySchedule, employees: &[Employee], cfg: &EngineConfig) {
    for employee in employees.iter().filter(|e| e.active) {
        let shifts = schedule.shift_count(&employee.id);
        let minutes = schedule.weekly_minutes(&employee.id);

        if let Some(min) = employee.min_shifts_per_week {
            if shifts < min as usize {
                schedule.add_warning(ScheduleWarning::employee(
                    WarningKind::UnderMinimumShifts,
                    &employee.id,
                    format!(
                        "{} has {} of {} minimum weekly shifts",
                        employee.id, shifts, min
                    ),
                ));
            }
        }

        if minutes >= cfg.overtime_min {
            schedule.add_warning(ScheduleWarning::employee(
                WarningKind::ApproachingOvertime,
                &employee.id,
                format!(
                    "{} works {:.1}h, over the {:.1}h overtime threshold",
                    employee.id,
                    minutes as f64 / 60.0,
                    cfg.overtime_min as f64 / 60.0
                ),
            ));
        } else if minutes >= cfg.overtime_min - cfg.overtime_margin_min {
            schedule.add_warning(ScheduleWarning::employee(
                WarningKind::ApproachingOvertime,
                &employee.id,
                format!(
                    "{} works {:.1}h, approaching the {:.1}h overtime threshold",
                    employee.id,
                    minutes as f64 / 60.0,
                    cfg.overtime_min as f64 / 60.0
                ),
            ));
        }

        rest_warnings(schedule, employee, cfg);
    }
}

/// Advisory check for short turnarounds between consecutive days.
fn rest_warnings(schedule: &mut WeeklySchedule, employee: &Employee, cfg: &EngineConfig) {
    let mut spans: Vec<_> = schedule
        .assignments_for_employee(&employee.id)
        .into_iter()
        .map(|a| (a.date, a.window))
        .collect();
    spans.sort_by_key(|(date, window)| (*date, window.start));

    let mut warnings = Vec::new();
    for pair in spans.windows(2) {
        let (d1, w1) = pair[0];
        let (d2, w2) = pair[1];
        let Some(next) = d1.succ_opt() else {
            continue;
        };
        if d2 != next {
            continue;
        }
        let rest = (MINUTES_PER_DAY - w1.end) + w2.start;
        if rest < cfg.min_rest_min {
            warnings.push(ScheduleWarning::employee(
                WarningKind::InsufficientRest,
                &employee.id,
                format!(
                    "{} finishes {} on {} and starts {} on {} ({:.1}h rest)",
                    employee.id,
                    format_minute(w1.end),
                    d1,
                    format_minute(w2.start),
                    d2,
                    rest as f64 / 60.0
                ),
            ));
        }
    }
    for w in warnings {
        schedule.add_warning(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AssignmentSource, ConflictKind, ScheduleAssignment, ShiftFilter,
    };
    use crate::time::TimeRange;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn tue() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
    }

    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    fn schedule_with(assignments: Vec<ScheduleAssignment>) -> WeeklySchedule {
        let mut s = WeeklySchedule::new(monday());
        for a in assignments {
            s.add_assignment(a);
        }
        s
    }

    fn fill(shift: &str, emp: &str, date: NaiveDate, window: TimeRange) -> ScheduleAssignment {
        ScheduleAssignment::new(shift, emp, date, window, AssignmentSource::Fill)
    }

    #[test]
    fn test_closed_day_assignments_dropped() {
        let overrides = [ScheduleOverride::close_day(Weekday::Tue)];
        let mut s = schedule_with(vec![
            fill("tue-opener", "a", tue(), TimeRange::from_hm(7, 15, 12, 0)),
            fill("wed-opener", "a", wed(), TimeRange::from_hm(7, 15, 12, 0)),
        ]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert_eq!(s.assignments.len(), 1);
        assert_eq!(s.assignments[0].date, wed());
    }

    #[test]
    fn test_early_close_truncates_and_drops() {
        let overrides = [ScheduleOverride::close_early(Weekday::Tue, 11 * 60)];
        let mut s = schedule_with(vec![
            fill("tue-opener", "a", tue(), TimeRange::from_hm(7, 15, 12, 0)),
            fill("tue-dinner", "b", tue(), TimeRange::from_hm(16, 0, 21, 0)),
        ]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert_eq!(s.assignments.len(), 1);
        assert_eq!(s.assignments[0].window, TimeRange::from_hm(7, 15, 11, 0));
    }

    #[test]
    fn test_violated_exclude_reported() {
        let overrides = [ScheduleOverride::exclude("a", Weekday::Tue, ShiftFilter::Any)];
        let mut s = schedule_with(vec![fill(
            "tue-opener",
            "a",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
        )]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert_eq!(s.conflicts.len(), 1);
        assert_eq!(s.conflicts[0].kind, ConflictKind::RuleViolation);
        assert_eq!(s.conflicts[0].employee_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_satisfied_exclude_silent() {
        // Scenario A tail: no assignment for the excluded employee means
        // no conflict either.
        let overrides = [ScheduleOverride::exclude("a", Weekday::Tue, ShiftFilter::Any)];
        let mut s = schedule_with(vec![]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert!(s.conflicts.is_empty());
    }

    #[test]
    fn test_unhonored_assign_reported() {
        let overrides = [ScheduleOverride::assign("a", Weekday::Tue, ShiftFilter::Any)];
        let mut s = schedule_with(vec![]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert_eq!(s.conflicts.len(), 1);
        assert_eq!(s.conflicts[0].kind, ConflictKind::RuleViolation);

        let mut s = schedule_with(vec![fill(
            "tue-opener",
            "a",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
        )]);
        finalize(&mut s, &[], &overrides, &EngineConfig::default());
        assert!(s.conflicts.is_empty());
    }

    #[test]
    fn test_under_minimum_shifts_warning() {
        let employees = [Employee::new("a", "a").with_min_shifts(3)];
        let mut s = schedule_with(vec![fill(
            "tue-opener",
            "a",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
        )]);
        finalize(&mut s, &employees, &[], &EngineConfig::default());
        let w = s
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::UnderMinimumShifts)
            .unwrap();
        assert!(w.message.contains("1 of 3"));
    }

    #[test]
    fn test_overtime_warnings() {
        let employees = [Employee::new("a", "a")];
        // Six 6.5h shifts = 39h, over the 38h default
        let mut assignments = Vec::new();
        for d in 3..9 {
            let date = NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
            assignments.push(fill("s", "a", date, TimeRange::from_hm(9, 0, 15, 30)));
        }
        let mut s = schedule_with(assignments);
        finalize(&mut s, &employees, &[], &EngineConfig::default());
        let w = s
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::ApproachingOvertime)
            .unwrap();
        assert!(w.message.contains("over"));
    }

    #[test]
    fn test_no_overtime_warning_under_margin() {
        let employees = [Employee::new("a", "a")];
        let mut s = schedule_with(vec![fill(
            "tue-opener",
            "a",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
        )]);
        finalize(&mut s, &employees, &[], &EngineConfig::default());
        assert!(s
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::ApproachingOvertime));
    }

    #[test]
    fn test_insufficient_rest_warning() {
        let employees = [Employee::new("a", "a")];
        // Close Tuesday 23:00, open Wednesday 07:15: 8.25h rest < 10h
        let mut s = schedule_with(vec![
            fill("tue-close", "a", tue(), TimeRange::from_hm(17, 0, 23, 0)),
            fill("wed-opener", "a", wed(), TimeRange::from_hm(7, 15, 12, 0)),
        ]);
        finalize(&mut s, &employees, &[], &EngineConfig::default());
        assert!(s
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::InsufficientRest));
    }

    #[test]
    fn test_rest_ok_between_spread_days() {
        let employees = [Employee::new("a", "a")];
        let mut s = schedule_with(vec![
            fill("tue-opener", "a", tue(), TimeRange::from_hm(7, 15, 12, 0)),
            fill("wed-opener", "a", wed(), TimeRange::from_hm(7, 15, 12, 0)),
        ]);
        finalize(&mut s, &employees, &[], &EngineConfig::default());
        assert!(s
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::InsufficientRest));
    }
}

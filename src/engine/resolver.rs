//! Precedence resolver and assignment engine.
//!
//! Builds the initial assignment set in four tiers; later tiers never
//! contradict earlier ones:
//! 1. locked shifts from a prior run
//! 2. fixed-shift permanent rules
//! 3. forced assign / custom-time overrides
//! 4. greedy fill of remaining slot capacity
//!
//! Every placement goes through the constraint evaluator; the tier only
//! decides which variant applies and how windows are chosen.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::evaluator::{can_assign, can_assign_forced, Evaluation, ShiftCandidate};
use crate::expand::date_for;
use crate::models::overrides::{closed_day, early_close};
use crate::models::{
    classify_part, weekday_key, AssignmentSource, Employee, EngineConfig, OverrideKind,
    PermanentRuleKind, ScheduleAssignment, ScheduleConflict, ScheduleOverride, ScheduleWarning,
    Shift, WarningKind, WeeklySchedule, OPEN_DAYS,
};
use crate::time::TimeRange;

use super::ranking::{rank, RankedCandidate};

/// Runs all four precedence tiers over the expanded shifts.
///
/// `week_start` must already be normalized to a Monday.
pub fn resolve(
    week_start: NaiveDate,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    shifts: &[Shift],
    locked: &[ScheduleAssignment],
    cfg: &EngineConfig,
) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::new(week_start);

    admit_locked(&mut schedule, employees, overrides, locked);
    admit_fixed_rules(&mut schedule, week_start, employees, overrides);
    let extra_shifts = apply_forced_overrides(&mut schedule, employees, overrides, shifts, cfg);
    greedy_fill(&mut schedule, employees, overrides, shifts, &extra_shifts, cfg);

    schedule
}

/// Tier 1: re-admit locked shifts verbatim, or warn.
fn admit_locked(
    schedule: &mut WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    locked: &[ScheduleAssignment],
) {
    for lock in locked {
        let employee = employees.iter().find(|e| e.id == lock.employee_id);
        let drop_reason = match employee {
            None => Some("employee is no longer on the roster".to_string()),
            Some(e) if !e.active => Some("employee is inactive".to_string()),
            Some(e) => {
                let day = lock.date.weekday();
                if day == Weekday::Mon || closed_day(overrides, day).is_some() {
                    Some(format!("{} is now closed", weekday_key(day)))
                } else if e.excluded_on(lock.date) {
                    Some(format!("employee is excluded on {}", lock.date))
                } else if schedule.has_overlap(&e.id, lock.date, lock.window) {
                    // Earlier locks win; overlapping assignments per
                    // employee/date are never emitted
                    Some(format!(
                        "window {} collides with an earlier locked shift",
                        lock.window.label()
                    ))
                } else {
                    None
                }
            }
        };

        match drop_reason {
            Some(reason) => schedule.add_warning(ScheduleWarning::employee(
                WarningKind::LockDropped,
                &lock.employee_id,
                format!("locked shift {} dropped: {}", lock.shift_id, reason),
            )),
            None => schedule.add_assignment(ScheduleAssignment::new(
                &lock.shift_id,
                &lock.employee_id,
                lock.date,
                lock.window,
                AssignmentSource::Locked,
            )),
        }
    }
}

/// Tier 2: admit fixed-shift permanent rules.
fn admit_fixed_rules(
    schedule: &mut WeeklySchedule,
    week_start: NaiveDate,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
) {
    for employee in employees.iter().filter(|e| e.active) {
        for (rule_idx, rule) in employee.permanent_rules.iter().enumerate() {
            let PermanentRuleKind::FixedShift(window) = &rule.kind else {
                continue;
            };
            let window = *window;
            for day in OPEN_DAYS {
                if !rule.applies_on(day) || closed_day(overrides, day).is_some() {
                    continue;
                }
                let date = date_for(week_start, day);
                if employee.excluded_on(date) {
                    continue;
                }

                let mut window = window;
                if let Some(close) = early_close(overrides, day) {
                    if window.start >= close {
                        continue;
                    }
                    window.end = window.end.min(close);
                }

                let part = classify_part(window.start);
                let excluded = overrides.iter().any(|o| {
                    o.kind == OverrideKind::Exclude
                        && o.day == day
                        && o.covers_employee(&employee.id)
                        && o.filter.matches(part)
                });
                if excluded {
                    continue;
                }

                // A locked shift in the same window wins
                if schedule.has_overlap(&employee.id, date, window) {
                    continue;
                }

                schedule.add_assignment(ScheduleAssignment::new(
                    // Rule index keeps ids unique when several fixed
                    // rules share a weekday
                    format!("fixed-{}-{}-{}", employee.id, weekday_key(day), rule_idx + 1),
                    &employee.id,
                    date,
                    window,
                    AssignmentSource::FixedRule,
                ));
            }
        }
    }
}

/// Tier 3: forced assign / custom-time overrides.
///
/// Returns synthesized remainder shifts for partial custom times; the
/// greedy fill treats them like any other understaffed shift.
fn apply_forced_overrides(
    schedule: &mut WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    shifts: &[Shift],
    cfg: &EngineConfig,
) -> Vec<Shift> {
    let mut extra_shifts = Vec::new();

    for o in overrides {
        if !matches!(o.kind, OverrideKind::Assign | OverrideKind::CustomTime) {
            continue;
        }
        let Some(employee_id) = o.employee_id() else {
            continue; // business-wide sentinels are handled by the expander
        };
        let Some(employee) = employees.iter().find(|e| e.id == employee_id) else {
            continue; // surfaced as rule_violation by the reporting pass
        };
        if !employee.active {
            continue;
        }

        // Matching slots with spare headcount that the employee does not
        // already hold, tried in expansion order until one admits the
        // placement.
        let targets: Vec<usize> = shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.day == o.day
                    && o.filter.matches(s.part)
                    && schedule.filled_count(&s.id) < s.headcount as usize
                    && !schedule
                        .assignments
                        .iter()
                        .any(|a| a.shift_id == s.id && a.employee_id == employee.id)
            })
            .map(|(i, _)| i)
            .collect();

        for i in targets {
            let shift = &shifts[i];
            let (window, remainder) = forced_window(o, shift.window);
            if window.is_empty() {
                continue;
            }

            let candidate = ShiftCandidate::from_shift(shift).with_window(window);
            if !can_assign_forced(employee, &candidate, &schedule.assignments, overrides, cfg)
                .is_allowed()
            {
                continue;
            }

            schedule.add_assignment(ScheduleAssignment::new(
                &shift.id,
                &employee.id,
                shift.date,
                window,
                AssignmentSource::Override,
            ));

            if let Some(remainder) = remainder {
                if !remainder.is_empty() {
                    schedule.add_warning(ScheduleWarning::employee(
                        WarningKind::CoverageNeeded,
                        &employee.id,
                        format!(
                            "{} works {} on {}; coverage needed for {}",
                            employee.id,
                            window.label(),
                            shift.id,
                            remainder.label()
                        ),
                    ));
                    extra_shifts.push(
                        Shift::new(
                            format!("{}-remainder", shift.id),
                            shift.date,
                            shift.day,
                            remainder,
                            shift.role,
                            &shift.label,
                        )
                        .with_headcount(1),
                    );
                }
            }
            break;
        }
    }

    extra_shifts
}

/// Worked window for a forced override, plus the uncovered remainder of
/// the slot for partial custom times.
fn forced_window(o: &ScheduleOverride, slot: TimeRange) -> (TimeRange, Option<TimeRange>) {
    if o.kind != OverrideKind::CustomTime {
        return (slot, None);
    }
    match (o.start, o.end) {
        (Some(start), Some(end)) => (TimeRange::new(start, end), None),
        // "starts at 10am": the head of the slot goes uncovered
        (Some(start), None) => (
            TimeRange::new(start, slot.end),
            Some(TimeRange::new(slot.start, start)),
        ),
        // "leaves at 1pm": the tail of the slot goes uncovered
        (None, Some(end)) => (
            TimeRange::new(slot.start, end),
            Some(TimeRange::new(end, slot.end)),
        ),
        (None, None) => (slot, None),
    }
}

/// Tier 4: greedy fill of remaining slot capacity.
fn greedy_fill(
    schedule: &mut WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    shifts: &[Shift],
    extra_shifts: &[Shift],
    cfg: &EngineConfig,
) {
    for shift in shifts.iter().chain(extra_shifts) {
        let filled = schedule.filled_count(&shift.id);
        let need = (shift.headcount as usize).saturating_sub(filled);
        if need == 0 {
            continue;
        }

        // Gather employees passing the full evaluator, substituting
        // fixed-shift windows when signalled.
        let mut windows: HashMap<usize, TimeRange> = HashMap::new();
        let mut candidates: Vec<RankedCandidate<'_>> = Vec::new();

        for (roster_index, employee) in employees.iter().enumerate() {
            let already_on_shift = schedule
                .assignments
                .iter()
                .any(|a| a.shift_id == shift.id && a.employee_id == employee.id);
            if already_on_shift {
                continue;
            }

            let candidate = ShiftCandidate::from_shift(shift);
            let window = match can_assign(employee, &candidate, &schedule.assignments, overrides, cfg)
            {
                Evaluation::Blocked(_) => continue,
                Evaluation::Allowed { fixed_window: None } => shift.window,
                Evaluation::Allowed {
                    fixed_window: Some(w),
                } if w == shift.window => w,
                Evaluation::Allowed {
                    fixed_window: Some(w),
                } => {
                    let substituted = candidate.with_window(w);
                    if can_assign(employee, &substituted, &schedule.assignments, overrides, cfg)
                        .is_allowed()
                    {
                        w
                    } else {
                        continue;
                    }
                }
            };

            windows.insert(roster_index, window);
            candidates.push(RankedCandidate {
                employee,
                roster_index,
                minutes_this_week: schedule.weekly_minutes(&employee.id),
                shifts_this_week: schedule.shift_count(&employee.id),
            });
        }

        rank(shift, overrides, &mut candidates);

        let mut assigned = 0;
        for c in &candidates {
            if assigned == need {
                break;
            }
            schedule.add_assignment(ScheduleAssignment::new(
                &shift.id,
                &c.employee.id,
                shift.date,
                windows[&c.roster_index],
                AssignmentSource::Fill,
            ));
            assigned += 1;
        }

        if assigned < need {
            schedule.add_conflict(ScheduleConflict::no_coverage(
                shift.date,
                &shift.id,
                format!(
                    "{} ({}) has {} of {} required staff",
                    shift.id,
                    shift.window.label(),
                    filled + assigned,
                    shift.headcount
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DayAvailability, EmployeeRestriction, Exclusion, PermanentRule, ShiftFilter, SlotRole,
    };

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn tue() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
    }

    fn open_employee(id: &str) -> Employee {
        let mut e = Employee::new(id, id).with_scales(3, 3);
        for day in OPEN_DAYS {
            e = e.with_day(day, DayAvailability::any());
        }
        e
    }

    fn tue_opener() -> Shift {
        Shift::new(
            "tue-opener",
            tue(),
            Weekday::Tue,
            TimeRange::from_hm(7, 15, 12, 0),
            SlotRole::Opener,
            "Opener",
        )
    }

    #[test]
    fn test_lock_readmitted_verbatim() {
        let employees = [open_employee("e1")];
        let lock = ScheduleAssignment::new(
            "tue-opener",
            "e1",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
            AssignmentSource::Locked,
        );
        let schedule = resolve(monday(), &employees, &[], &[], &[lock], &EngineConfig::default());
        assert_eq!(schedule.assignments.len(), 1);
        assert_eq!(schedule.assignments[0].source, AssignmentSource::Locked);
        assert!(schedule.warnings.is_empty());
    }

    #[test]
    fn test_lock_dropped_on_closed_day() {
        let employees = [open_employee("e1")];
        let overrides = [ScheduleOverride::close_day(Weekday::Tue)];
        let lock = ScheduleAssignment::new(
            "tue-opener",
            "e1",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
            AssignmentSource::Locked,
        );
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &[],
            &[lock],
            &EngineConfig::default(),
        );
        assert!(schedule.assignments.is_empty());
        assert_eq!(schedule.warnings.len(), 1);
        assert_eq!(schedule.warnings[0].kind, WarningKind::LockDropped);
    }

    #[test]
    fn test_overlapping_lock_dropped_with_warning() {
        // Two locks for the same employee and date with colliding windows:
        // the first wins, the second is dropped, never both.
        let employees = [open_employee("e1")];
        let locks = [
            ScheduleAssignment::new(
                "s1",
                "e1",
                tue(),
                TimeRange::from_hm(9, 0, 14, 0),
                AssignmentSource::Locked,
            ),
            ScheduleAssignment::new(
                "s2",
                "e1",
                tue(),
                TimeRange::from_hm(12, 0, 17, 0),
                AssignmentSource::Locked,
            ),
        ];
        let schedule = resolve(monday(), &employees, &[], &[], &locks, &EngineConfig::default());

        assert_eq!(schedule.assignments.len(), 1);
        assert_eq!(schedule.assignments[0].shift_id, "s1");
        assert_eq!(schedule.warnings.len(), 1);
        assert_eq!(schedule.warnings[0].kind, WarningKind::LockDropped);
        assert!(schedule.warnings[0].message.contains("s2"));
    }

    #[test]
    fn test_disjoint_locks_both_kept() {
        let employees = [open_employee("e1")];
        let locks = [
            ScheduleAssignment::new(
                "s1",
                "e1",
                tue(),
                TimeRange::from_hm(9, 0, 12, 0),
                AssignmentSource::Locked,
            ),
            ScheduleAssignment::new(
                "s2",
                "e1",
                tue(),
                TimeRange::from_hm(16, 0, 21, 0),
                AssignmentSource::Locked,
            ),
        ];
        let schedule = resolve(monday(), &employees, &[], &[], &locks, &EngineConfig::default());
        assert_eq!(schedule.assignments.len(), 2);
        assert!(schedule.warnings.is_empty());
    }

    #[test]
    fn test_lock_dropped_on_exclusion() {
        let employees = [open_employee("e1").with_exclusion(Exclusion::single(tue()))];
        let lock = ScheduleAssignment::new(
            "tue-opener",
            "e1",
            tue(),
            TimeRange::from_hm(7, 15, 12, 0),
            AssignmentSource::Locked,
        );
        let schedule = resolve(monday(), &employees, &[], &[], &[lock], &EngineConfig::default());
        assert!(schedule.assignments.is_empty());
        assert_eq!(schedule.warnings[0].kind, WarningKind::LockDropped);
    }

    #[test]
    fn test_fixed_rule_admitted_despite_unavailability() {
        // Available nowhere, fixed Saturday 09:00-12:00 → still scheduled
        let window = TimeRange::from_hm(9, 0, 12, 0);
        let employees = [Employee::new("w", "w")
            .with_scales(3, 3)
            .with_permanent_rule(PermanentRule::fixed_shift(window, vec![Weekday::Sat]))];
        let schedule = resolve(monday(), &employees, &[], &[], &[], &EngineConfig::default());
        assert_eq!(schedule.assignments.len(), 1);
        let a = &schedule.assignments[0];
        assert_eq!(a.window, window);
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
        assert_eq!(a.source, AssignmentSource::FixedRule);
    }

    #[test]
    fn test_fixed_rule_blocked_by_exclude_override() {
        let window = TimeRange::from_hm(9, 0, 12, 0);
        let employees = [open_employee("w")
            .with_permanent_rule(PermanentRule::fixed_shift(window, vec![Weekday::Sat]))];
        let overrides = [ScheduleOverride::exclude("w", Weekday::Sat, ShiftFilter::Any)];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &[],
            &[],
            &EngineConfig::default(),
        );
        assert!(schedule.assignments.is_empty());
    }

    #[test]
    fn test_fixed_rule_truncated_by_early_close() {
        let window = TimeRange::from_hm(9, 0, 13, 0);
        let employees = [open_employee("w")
            .with_permanent_rule(PermanentRule::fixed_shift(window, vec![Weekday::Sat]))];
        let overrides = [ScheduleOverride::close_early(Weekday::Sat, 11 * 60)];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &[],
            &[],
            &EngineConfig::default(),
        );
        assert_eq!(schedule.assignments[0].window, TimeRange::from_hm(9, 0, 11, 0));
    }

    #[test]
    fn test_forced_assign_bypasses_availability() {
        // No availability declared, assign override → placed anyway
        let employees = [Employee::new("y", "y").with_scales(3, 3)];
        let overrides = [ScheduleOverride::assign("y", Weekday::Tue, ShiftFilter::Any)];
        let shifts = [tue_opener()];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &shifts,
            &[],
            &EngineConfig::default(),
        );
        assert_eq!(schedule.assignments.len(), 1);
        assert_eq!(schedule.assignments[0].source, AssignmentSource::Override);
        assert_eq!(schedule.assignments[0].shift_id, "tue-opener");
    }

    #[test]
    fn test_forced_assign_tries_later_matching_slot() {
        // A no-start-before restriction blocks the earliest matching slot;
        // the override moves on to the next one instead of giving up.
        let employees = [open_employee("y")
            .with_restriction(EmployeeRestriction::no_start_before(9 * 60, vec![]))];
        let overrides = [ScheduleOverride::assign("y", Weekday::Tue, ShiftFilter::Any)];
        let shifts = [
            tue_opener(),
            Shift::new(
                "tue-mid",
                tue(),
                Weekday::Tue,
                TimeRange::from_hm(10, 0, 15, 0),
                SlotRole::MidShift,
                "Mid Shift",
            ),
        ];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &shifts,
            &[],
            &EngineConfig::default(),
        );

        let y = schedule.assignments_for_employee("y");
        assert_eq!(y.len(), 1);
        assert_eq!(y[0].shift_id, "tue-mid");
        assert_eq!(y[0].source, AssignmentSource::Override);
    }

    #[test]
    fn test_two_fixed_rules_same_day_get_distinct_ids() {
        let employees = [open_employee("w")
            .with_permanent_rule(PermanentRule::fixed_shift(
                TimeRange::from_hm(9, 0, 12, 0),
                vec![Weekday::Sat],
            ))
            .with_permanent_rule(PermanentRule::fixed_shift(
                TimeRange::from_hm(13, 0, 16, 0),
                vec![Weekday::Sat],
            ))];
        let schedule = resolve(monday(), &employees, &[], &[], &[], &EngineConfig::default());

        assert_eq!(schedule.assignments.len(), 2);
        assert_ne!(
            schedule.assignments[0].shift_id,
            schedule.assignments[1].shift_id
        );
    }

    #[test]
    fn test_forced_assign_skipped_when_excluded() {
        let employees = [open_employee("y")];
        let overrides = [
            ScheduleOverride::assign("y", Weekday::Tue, ShiftFilter::Any),
            ScheduleOverride::exclude("y", Weekday::Tue, ShiftFilter::Any),
        ];
        let shifts = [tue_opener()];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &shifts,
            &[],
            &EngineConfig::default(),
        );
        // Exclude outranks assign; greedy fill also blocked, so the slot
        // goes unfilled.
        assert!(schedule.assignments.is_empty());
        assert_eq!(schedule.conflicts.len(), 1);
    }

    #[test]
    fn test_partial_custom_time_synthesizes_remainder() {
        // "leaves at 1pm" on a 07:15-14:00 slot
        let slot = Shift::new(
            "tue-long",
            tue(),
            Weekday::Tue,
            TimeRange::from_hm(7, 15, 14, 0),
            SlotRole::Opener,
            "Opener",
        );
        let employees = [
            open_employee("y").with_scales(0, 3),
            open_employee("z").with_scales(0, 3),
        ];
        let overrides = [ScheduleOverride::custom_time(
            "y",
            Weekday::Tue,
            ShiftFilter::Any,
            None,
            Some(13 * 60),
        )];
        let schedule = resolve(
            monday(),
            &employees,
            &overrides,
            &[slot],
            &[],
            &EngineConfig::default(),
        );

        let y = schedule.assignments_for_employee("y");
        assert_eq!(y.len(), 1);
        assert_eq!(y[0].window, TimeRange::from_hm(7, 15, 13, 0));

        // The 13:00-14:00 remainder was synthesized but is below the 3h
        // minimum for non-bartender z; a coverage warning plus a
        // no-coverage conflict is still better than silent shrinkage.
        assert!(schedule
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::CoverageNeeded));
        let remainder = schedule
            .assignments
            .iter()
            .find(|a| a.shift_id == "tue-long-remainder");
        assert!(remainder.is_none());
        assert!(schedule
            .conflicts
            .iter()
            .any(|c| c.shift_id.as_deref() == Some("tue-long-remainder")));
    }

    #[test]
    fn test_greedy_fill_and_no_coverage() {
        let employees = [open_employee("a")];
        let shifts = [
            tue_opener(),
            Shift::new(
                "tue-dinner",
                tue(),
                Weekday::Tue,
                TimeRange::from_hm(16, 0, 21, 0),
                SlotRole::Dinner(1),
                "Dinner 1",
            )
            .with_headcount(2),
        ];
        let schedule = resolve(monday(), &employees, &[], &shifts, &[], &EngineConfig::default());

        // a takes the opener and one dinner seat; the second seat conflicts
        assert_eq!(schedule.assignments.len(), 2);
        assert_eq!(schedule.conflicts.len(), 1);
        assert_eq!(
            schedule.conflicts[0].shift_id.as_deref(),
            Some("tue-dinner")
        );
    }

    #[test]
    fn test_fill_substitutes_fixed_window() {
        // Fixed-shift employee not yet admitted (rule day differs from
        // tier-2 processing is irrelevant here): fill substitutes the
        // rule's window instead of the slot's.
        let window = TimeRange::from_hm(9, 0, 12, 0);
        let employees = [open_employee("w")
            .with_permanent_rule(PermanentRule::fixed_shift(window, vec![Weekday::Tue]))];
        let shifts = [tue_opener()];
        let schedule = resolve(monday(), &employees, &[], &shifts, &[], &EngineConfig::default());

        // Tier 2 already placed the fixed window; the opener slot then has
        // no candidate left (overlap) and conflicts.
        assert_eq!(schedule.assignments.len(), 1);
        assert_eq!(schedule.assignments[0].window, window);
        assert!(schedule
            .conflicts
            .iter()
            .any(|c| c.shift_id.as_deref() == Some("tue-opener")));
    }

    #[test]
    fn test_deterministic_roster_order() {
        let employees = [open_employee("first"), open_employee("second")];
        let shifts = [tue_opener()];
        let s1 = resolve(monday(), &employees, &[], &shifts, &[], &EngineConfig::default());
        let s2 = resolve(monday(), &employees, &[], &shifts, &[], &EngineConfig::default());
        assert_eq!(s1, s2);
        assert_eq!(s1.assignments[0].employee_id, "first");
    }
}

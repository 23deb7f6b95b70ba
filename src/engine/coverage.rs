//! Bartender coverage gap-filler.
//!
//! Second pass over the assignment set. Employees below the bartending
//! threshold (or flagged as needing a bartender on shift) must be
//! overlapped by a qualified bartender for every minute they work.
//! Uncovered sub-intervals either get a synthetic coverage shift or a
//! `no_bartender` conflict; the requirement is never silently dropped.

use chrono::Datelike;

use crate::evaluator::{can_assign, Evaluation, ShiftCandidate};
use crate::models::{
    AssignmentSource, Employee, EngineConfig, ScheduleAssignment, ScheduleConflict,
    ScheduleOverride, ScheduleWarning, SlotRole, WarningKind, WeeklySchedule,
};
use crate::time::{merge_ranges, subtract_ranges, TimeRange};

/// Detects supervision gaps and fills them or records conflicts.
pub fn fill_bartender_gaps(
    schedule: &mut WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    cfg: &EngineConfig,
) {
    // Snapshot; coverage shifts added along the way still count as cover
    // because gaps are recomputed against the live schedule.
    let supervised: Vec<ScheduleAssignment> = schedule
        .assignments
        .iter()
        .filter(|a| {
            employees
                .iter()
                .find(|e| e.id == a.employee_id)
                .is_some_and(|e| !cfg.is_bartender(e.bartending_scale) || e.needs_bartender)
        })
        .cloned()
        .collect();

    for (i, assignment) in supervised.iter().enumerate() {
        let cover = bartender_cover(schedule, employees, &assignment.employee_id, assignment, cfg);
        let gaps = subtract_ranges(assignment.window, &cover);

        for (g, gap) in gaps.into_iter().enumerate() {
            match find_cover(schedule, employees, overrides, assignment, gap, cfg) {
                Some(bartender_id) => {
                    let shift_id = format!("coverage-{}-{}-{}", assignment.date, i, g);
                    schedule.add_warning(ScheduleWarning::employee(
                        WarningKind::CoverageNeeded,
                        &bartender_id,
                        format!(
                            "{} covers the bar {} on {} while {} is on shift",
                            bartender_id,
                            gap.label(),
                            assignment.date,
                            assignment.employee_id
                        ),
                    ));
                    schedule.add_assignment(ScheduleAssignment::new(
                        shift_id,
                        bartender_id,
                        assignment.date,
                        gap,
                        AssignmentSource::Coverage,
                    ));
                }
                None => schedule.add_conflict(ScheduleConflict::no_bartender(
                    assignment.date,
                    &assignment.employee_id,
                    format!(
                        "no bartender on shift {} on {} while {} works",
                        gap.label(),
                        assignment.date,
                        assignment.employee_id
                    ),
                )),
            }
        }
    }
}

/// Merged intervals worked by qualified bartenders on the assignment's
/// date, excluding the supervised employee's own shifts.
fn bartender_cover(
    schedule: &WeeklySchedule,
    employees: &[Employee],
    supervised_id: &str,
    assignment: &ScheduleAssignment,
    cfg: &EngineConfig,
) -> Vec<TimeRange> {
    let intervals: Vec<TimeRange> = schedule
        .assignments
        .iter()
        .filter(|a| {
            a.date == assignment.date
                && a.employee_id != supervised_id
                && employees
                    .iter()
                    .find(|e| e.id == a.employee_id)
                    .is_some_and(|e| cfg.is_bartender(e.bartending_scale))
        })
        .map(|a| a.window)
        .collect();
    merge_ranges(intervals)
}

/// First qualified bartender, in roster order, who can take the gap.
fn find_cover(
    schedule: &WeeklySchedule,
    employees: &[Employee],
    overrides: &[ScheduleOverride],
    assignment: &ScheduleAssignment,
    gap: TimeRange,
    cfg: &EngineConfig,
) -> Option<String> {
    let day = assignment.date.weekday();
    for bartender in employees {
        if !cfg.is_bartender(bartender.bartending_scale) || bartender.id == assignment.employee_id {
            continue;
        }

        let candidate = ShiftCandidate::new(day, assignment.date, SlotRole::Bar, gap);
        match can_assign(bartender, &candidate, &schedule.assignments, overrides, cfg) {
            Evaluation::Blocked(_) => continue,
            Evaluation::Allowed { fixed_window } => {
                // A fixed-shift rule pins the bartender elsewhere unless its
                // window already contains the gap.
                if fixed_window.is_some_and(|w| !w.contains_range(&gap)) {
                    continue;
                }
                return Some(bartender.id.clone());
            }
        }
    }
    None
}

//! Candidate ordering for the greedy fill pass.
//!
//! Candidates are compared on a strict key sequence; the final tie-break
//! is stable roster input order, so ranking is deterministic end to end.
//!
//! Key order:
//! 1. explicit prioritize override
//! 2. opener affinity, for opener-labeled morning shifts only
//!    (day-matched can-open, then generic can-open, then an alone-scale
//!    tiebreak among the rest; a preference, never a gate)
//! 3. deficit against a declared minimum-shifts-per-week quota
//! 4. declared day-part preference match
//! 5. fewest minutes accumulated this week
//! 6. roster input order

use std::cmp::Reverse;

use crate::models::{Employee, OverrideKind, ScheduleOverride, Shift};
use crate::time::Minute;

/// A fill candidate together with its current weekly load.
#[derive(Debug)]
pub struct RankedCandidate<'a> {
    /// The candidate employee.
    pub employee: &'a Employee,
    /// Position in the input roster (final tie-break).
    pub roster_index: usize,
    /// Minutes already assigned this week.
    pub minutes_this_week: Minute,
    /// Shifts already assigned this week.
    pub shifts_this_week: usize,
}

/// Sorts candidates best-first for a shift.
pub fn rank(shift: &Shift, overrides: &[ScheduleOverride], candidates: &mut [RankedCandidate<'_>]) {
    candidates.sort_by_key(|c| sort_key(c, shift, overrides));
}

type Key = (bool, u8, Reverse<u8>, Reverse<i64>, bool, Minute, usize);

fn sort_key(candidate: &RankedCandidate<'_>, shift: &Shift, overrides: &[ScheduleOverride]) -> Key {
    let e = candidate.employee;

    let prioritized = overrides.iter().any(|o| {
        o.kind == OverrideKind::Prioritize
            && o.day == shift.day
            && o.employee_id() == Some(e.id.as_str())
            && o.filter.matches(shift.part)
    });

    let (opener_rank, opener_skill) = if shift.is_opener() {
        if e.opens_on(shift.day) && !e.open_days.is_empty() {
            (0, 0)
        } else if e.opens_on(shift.day) {
            (1, 0)
        } else {
            (2, e.alone_scale)
        }
    } else {
        (0, 0)
    };

    let deficit = e
        .min_shifts_per_week
        .map(|min| (min as i64 - candidate.shifts_this_week as i64).max(0))
        .unwrap_or(0);

    let pref_match = e.part_preference == Some(shift.part);

    (
        !prioritized,
        opener_rank,
        Reverse(opener_skill),
        Reverse(deficit),
        !pref_match,
        candidate.minutes_this_week,
        candidate.roster_index,
    )
}

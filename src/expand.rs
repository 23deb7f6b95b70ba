//! Shift/template expander.
//!
//! Turns weekly staffing needs plus business-hours overrides into the
//! concrete `Shift` instances for one target week. Closed days are
//! skipped with a warning; early closes drop slots starting at/after the
//! close time and truncate slots running past it. Monday never expands.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::overrides::{closed_day, early_close};
use crate::models::{
    weekday_key, ScheduleOverride, ScheduleWarning, Shift, StaffingShape, WarningKind, OPEN_DAYS,
};
use crate::time::format_minute;

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Date of a weekday within the week starting at `week_start` (a Monday).
pub fn date_for(week_start: NaiveDate, day: Weekday) -> NaiveDate {
    week_start + Duration::days(day.num_days_from_monday() as i64)
}

/// Expanded shifts plus the warnings raised along the way.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Concrete shift instances, in open-day order.
    pub shifts: Vec<Shift>,
    /// Closed-day and early-close notes.
    pub warnings: Vec<ScheduleWarning>,
}

/// Expands staffing needs into shift instances for the week of
/// `week_start` (normalized to its Monday).
pub fn expand_week(
    shape: StaffingShape,
    overrides: &[ScheduleOverride],
    week_start: NaiveDate,
) -> Expansion {
    let monday = week_monday(week_start);
    let needs = shape.normalize();
    let mut out = Expansion::default();

    for day in OPEN_DAYS {
        let Some(staffing) = needs.for_day(day) else {
            continue;
        };
        let date = date_for(monday, day);

        if closed_day(overrides, day).is_some() {
            out.warnings.push(ScheduleWarning::business(
                WarningKind::BusinessClosed,
                format!("{} {} is closed; no shifts scheduled", weekday_key(day), date),
            ));
            continue;
        }

        let close = early_close(overrides, day);
        let mut day_truncated = false;

        for slot in &staffing.slots {
            let mut window = slot.window;
            if let Some(close) = close {
                if window.start >= close {
                    day_truncated = true;
                    continue;
                }
                if window.end > close {
                    window.end = close;
                    day_truncated = true;
                }
            }
            out.shifts.push(
                Shift::new(&slot.id, date, day, window, slot.role(), &slot.label)
                    .with_headcount(slot.headcount),
            );
        }

        if let Some(close) = close {
            if day_truncated {
                out.warnings.push(ScheduleWarning::business(
                    WarningKind::EarlyClose,
                    format!(
                        "{} {} closes early at {}",
                        weekday_key(day),
                        date,
                        format_minute(close)
                    ),
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPart, DayStaffing, SlotRole, StaffingSlot, WeeklyStaffingNeeds};
    use crate::time::TimeRange;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn sample_needs() -> WeeklyStaffingNeeds {
        WeeklyStaffingNeeds::new()
            .with_day(
                DayStaffing::new(Weekday::Tue)
                    .with_slot(StaffingSlot::new(
                        "tue-opener",
                        TimeRange::from_hm(7, 15, 12, 0),
                        "Opener",
                    ))
                    .with_slot(StaffingSlot::new(
                        "tue-dinner",
                        TimeRange::from_hm(16, 0, 21, 0),
                        "Dinner 1",
                    )),
            )
            .with_day(DayStaffing::new(Weekday::Fri).with_slot(StaffingSlot::new(
                "fri-bar",
                TimeRange::from_hm(16, 0, 22, 0),
                "Bar",
            )))
    }

    #[test]
    fn test_week_monday_normalization() {
        let thursday = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(week_monday(thursday), monday());
        assert_eq!(week_monday(monday()), monday());
    }

    #[test]
    fn test_date_for() {
        assert_eq!(date_for(monday(), Weekday::Tue), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(date_for(monday(), Weekday::Sun), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    }

    #[test]
    fn test_basic_expansion() {
        let exp = expand_week(StaffingShape::Slots(sample_needs()), &[], monday());
        assert_eq!(exp.shifts.len(), 3);
        assert!(exp.warnings.is_empty());

        let opener = &exp.shifts[0];
        assert_eq!(opener.id, "tue-opener");
        assert_eq!(opener.date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(opener.part, DayPart::Morning);
        assert_eq!(opener.role, SlotRole::Opener);

        let bar = exp.shifts.iter().find(|s| s.id == "fri-bar").unwrap();
        assert!(bar.requires_bartender);
    }

    #[test]
    fn test_closed_day_skipped_with_warning() {
        let overrides = [ScheduleOverride::close_day(Weekday::Tue)];
        let exp = expand_week(StaffingShape::Slots(sample_needs()), &overrides, monday());
        assert!(exp.shifts.iter().all(|s| s.day != Weekday::Tue));
        assert_eq!(exp.shifts.len(), 1);
        assert_eq!(exp.warnings.len(), 1);
        assert_eq!(exp.warnings[0].kind, WarningKind::BusinessClosed);
    }

    #[test]
    fn test_early_close_truncates_and_drops() {
        // Close Tuesday at 18:00: dinner 16:00-21:00 truncates to 18:00
        let overrides = [ScheduleOverride::close_early(Weekday::Tue, 18 * 60)];
        let exp = expand_week(StaffingShape::Slots(sample_needs()), &overrides, monday());
        let dinner = exp.shifts.iter().find(|s| s.id == "tue-dinner").unwrap();
        assert_eq!(dinner.window, TimeRange::from_hm(16, 0, 18, 0));
        assert!(exp
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::EarlyClose));

        // Close at 15:00: dinner starts at/after the close and is dropped
        let overrides = [ScheduleOverride::close_early(Weekday::Tue, 15 * 60)];
        let exp = expand_week(StaffingShape::Slots(sample_needs()), &overrides, monday());
        assert!(exp.shifts.iter().all(|s| s.id != "tue-dinner"));
        assert!(exp.shifts.iter().any(|s| s.id == "tue-opener"));
    }

    #[test]
    fn test_early_close_without_effect_no_warning() {
        // Friday closes at 23:00; the bar shift already ends at 22:00
        let overrides = [ScheduleOverride::close_early(Weekday::Fri, 23 * 60)];
        let exp = expand_week(StaffingShape::Slots(sample_needs()), &overrides, monday());
        assert!(exp.warnings.is_empty());
        assert_eq!(exp.shifts.len(), 3);
    }

    #[test]
    fn test_monday_never_expands() {
        let needs = WeeklyStaffingNeeds::new().with_day(
            DayStaffing::new(Weekday::Mon).with_slot(StaffingSlot::new(
                "mon-opener",
                TimeRange::from_hm(7, 15, 12, 0),
                "Opener",
            )),
        );
        let exp = expand_week(StaffingShape::Slots(needs), &[], monday());
        assert!(exp.shifts.is_empty());
    }

    #[test]
    fn test_legacy_shape_expands() {
        let shape = StaffingShape::Legacy(vec![crate::models::LegacyDayStaffing {
            day: Weekday::Sat,
            morning_count: 1,
            night_count: 2,
        }]);
        let exp = expand_week(shape, &[], monday());
        assert_eq!(exp.shifts.len(), 3);
        assert_eq!(exp.shifts[0].id, "sat-morning-1");
        assert_eq!(exp.shifts[0].part, DayPart::Morning);
        assert_eq!(exp.shifts[2].id, "sat-night-2");
    }
}

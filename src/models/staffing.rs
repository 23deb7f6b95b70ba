//! Weekly staffing needs.
//!
//! The demand side of a generation run: which timed slots each open day
//! must fill. Two input shapes exist: the current flexible per-slot form
//! and the historical fixed morning/night headcount form. Both normalize
//! to slots at the expander boundary; the engine only ever sees slots.
//!
//! Free-text slot labels are normalized into canonical roles so that
//! bartender-requirement inference never depends on manager spelling.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::time::TimeRange;

/// Open weekdays, in schedule order. Monday is always closed.
pub const OPEN_DAYS: [Weekday; 6] = [
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A named, timed staffing need within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSlot {
    /// Slot identifier, unique within the week.
    pub id: String,
    /// Slot time window.
    pub window: TimeRange,
    /// Free-text label, e.g. "Opener", "2nd Server", "Bar".
    pub label: String,
    /// Required headcount (default 1).
    pub headcount: u32,
}

impl StaffingSlot {
    /// Creates a single-headcount slot.
    pub fn new(id: impl Into<String>, window: TimeRange, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            window,
            label: label.into(),
            headcount: 1,
        }
    }

    /// Sets the required headcount.
    pub fn with_headcount(mut self, headcount: u32) -> Self {
        self.headcount = headcount;
        self
    }

    /// Canonical role for this slot's label.
    pub fn role(&self) -> SlotRole {
        normalize_label(&self.label)
    }
}

/// Staffing needs for one open weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStaffing {
    /// Which weekday these slots belong to.
    pub day: Weekday,
    /// Slots to fill on that day.
    pub slots: Vec<StaffingSlot>,
}

impl DayStaffing {
    /// Creates an empty day.
    pub fn new(day: Weekday) -> Self {
        Self {
            day,
            slots: Vec::new(),
        }
    }

    /// Adds a slot.
    pub fn with_slot(mut self, slot: StaffingSlot) -> Self {
        self.slots.push(slot);
        self
    }
}

/// Staffing needs for a whole week, slot form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStaffingNeeds {
    /// One entry per open weekday that has any demand.
    pub days: Vec<DayStaffing>,
}

impl WeeklyStaffingNeeds {
    /// Creates empty needs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a day.
    pub fn with_day(mut self, day: DayStaffing) -> Self {
        self.days.push(day);
        self
    }

    /// Returns the staffing for a weekday, if defined.
    pub fn for_day(&self, day: Weekday) -> Option<&DayStaffing> {
        self.days.iter().find(|d| d.day == day)
    }
}

/// Historical fixed-headcount staffing for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDayStaffing {
    /// Which weekday.
    pub day: Weekday,
    /// Number of morning staff.
    pub morning_count: u32,
    /// Number of night staff.
    pub night_count: u32,
}

/// Either staffing input shape. `normalize` converts both to slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StaffingShape {
    /// Current flexible per-slot shape.
    Slots(WeeklyStaffingNeeds),
    /// Historical fixed morning/night headcounts.
    Legacy(Vec<LegacyDayStaffing>),
}

// Default windows for the legacy shape. Morning covers open through early
// afternoon; night covers dinner service.
const LEGACY_MORNING: TimeRange = TimeRange {
    start: 7 * 60 + 15,
    end: 14 * 60,
};
const LEGACY_NIGHT: TimeRange = TimeRange {
    start: 16 * 60,
    end: 21 * 60,
};

impl StaffingShape {
    /// Normalizes either shape into per-slot weekly needs.
    pub fn normalize(self) -> WeeklyStaffingNeeds {
        match self {
            StaffingShape::Slots(needs) => needs,
            StaffingShape::Legacy(days) => {
                let mut needs = WeeklyStaffingNeeds::new();
                for legacy in days {
                    let mut day = DayStaffing::new(legacy.day);
                    for i in 0..legacy.morning_count {
                        day.slots.push(StaffingSlot::new(
                            format!("{}-morning-{}", weekday_key(legacy.day), i + 1),
                            LEGACY_MORNING,
                            if i == 0 { "Opener" } else { "2nd Server" },
                        ));
                    }
                    for i in 0..legacy.night_count {
                        day.slots.push(StaffingSlot::new(
                            format!("{}-night-{}", weekday_key(legacy.day), i + 1),
                            LEGACY_NIGHT,
                            format!("Dinner {}", i + 1),
                        ));
                    }
                    if !day.slots.is_empty() {
                        needs.days.push(day);
                    }
                }
                needs
            }
        }
    }
}

/// Lowercase three-letter weekday key used in generated slot ids.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Canonical staffing roles inferred from slot labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRole {
    /// First shift of the day.
    Opener,
    /// Weekend variant of the opener.
    WeekendOpener,
    /// Second server of the day.
    SecondServer,
    /// Third server of the day.
    ThirdServer,
    /// Midday bridge shift.
    MidShift,
    /// Bar shift; implies bartender-qualified coverage.
    Bar,
    /// Closing shift.
    Closer,
    /// Numbered dinner shift.
    Dinner(u8),
    /// Unrecognized label.
    Other,
}

/// Normalizes a free-text slot label into a canonical role.
///
/// Deterministic and tolerant of case and common synonyms:
/// "bartending", "bartend" and "bar" all map to [`SlotRole::Bar`].
pub fn normalize_label(label: &str) -> SlotRole {
    let l = label.trim().to_lowercase();

    if l.contains("weekend") && l.contains("open") {
        return SlotRole::WeekendOpener;
    }
    if l.contains("open") {
        return SlotRole::Opener;
    }
    if l.contains("bar") {
        // covers "bar", "bartend", "bartending", "bar shift"
        return SlotRole::Bar;
    }
    if l.contains("clos") {
        return SlotRole::Closer;
    }
    if l.contains("mid") {
        return SlotRole::MidShift;
    }
    if l.contains("2nd") || l.contains("second") {
        return SlotRole::SecondServer;
    }
    if l.contains("3rd") || l.contains("third") {
        return SlotRole::ThirdServer;
    }
    if let Some(rest) = l.strip_prefix("dinner") {
        let n = rest.trim().parse::<u8>().unwrap_or(1);
        return SlotRole::Dinner(n);
    }
    SlotRole::Other
}

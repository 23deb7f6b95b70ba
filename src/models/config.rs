//! Engine tunables.
//!
//! Passed explicitly into every generation call so the engine stays pure
//! and testable; nothing is read from ambient state.

use serde::{Deserialize, Serialize};

use crate::time::Minute;

/// Tunable thresholds for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bartending scale at or above which an employee counts as a
    /// qualified bartender.
    pub bartender_threshold: u8,
    /// Minimum shift length for non-bartenders, in minutes.
    pub min_shift_min: Minute,
    /// Weekly minutes at which the overtime warning fires.
    pub overtime_min: Minute,
    /// Margin below the overtime threshold that already warns, in minutes.
    pub overtime_margin_min: Minute,
    /// Minimum rest between consecutive-day shifts, in minutes.
    /// Advisory only; produces a warning, never blocks placement.
    pub min_rest_min: Minute,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bartender_threshold: 3,
            min_shift_min: 3 * 60,
            overtime_min: 38 * 60,
            overtime_margin_min: 2 * 60,
            min_rest_min: 10 * 60,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bartender qualification threshold.
    pub fn with_bartender_threshold(mut self, threshold: u8) -> Self {
        self.bartender_threshold = threshold;
        self
    }

    /// Sets the minimum shift length in minutes.
    pub fn with_min_shift_min(mut self, minutes: Minute) -> Self {
        self.min_shift_min = minutes;
        self
    }

    /// Sets the overtime threshold in minutes.
    pub fn with_overtime_min(mut self, minutes: Minute) -> Self {
        self.overtime_min = minutes;
        self
    }

    /// Sets the minimum rest gap in minutes.
    pub fn with_min_rest_min(mut self, minutes: Minute) -> Self {
        self.min_rest_min = minutes;
        self
    }

    /// Whether a bartending scale qualifies as bartender.
    #[inline]
    pub fn is_bartender(&self, bartending_scale: u8) -> bool {
        bartending_scale >= self.bartender_threshold
    }
}

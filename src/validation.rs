//! Input validation for generation requests.
//!
//! Checks structural integrity of the roster, staffing template, and
//! overrides before generation. Detects:
//! - Duplicate IDs
//! - Inverted or empty time windows
//! - Inverted exclusion date ranges
//! - Overrides and locks referencing unknown employees
//!
//! Validation rejects malformed *references and shapes* only; a request
//! that is merely unsatisfiable (nobody available, impossible demands)
//! is valid input and surfaces as conflicts on the generated schedule.

use std::collections::HashSet;

use crate::engine::ScheduleRequest;
use crate::models::{PermanentRuleKind, RestrictionKind};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A time window has `end <= start`.
    InvalidTimeWindow,
    /// An exclusion range has `end < start`.
    InvalidDateRange,
    /// An override or lock references an employee not on the roster.
    UnknownEmployee,
    /// A staffing slot demands zero headcount.
    EmptySlot,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a generation request.
///
/// Checks:
/// 1. No duplicate employee IDs
/// 2. No duplicate staffing-slot IDs
/// 3. All slot, restriction, and permanent-rule windows run forward
/// 4. All exclusion date ranges run forward
/// 5. All overrides and locks reference employees on the roster
/// 6. No slot demands zero headcount
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &ScheduleRequest) -> ValidationResult {
    let mut errors = Vec::new();

    let mut employee_ids = HashSet::new();
    for e in &request.employees {
        if !employee_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }

        for x in &e.exclusions {
            if x.end < x.start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDateRange,
                    format!("Employee '{}' has exclusion ending before it starts", e.id),
                ));
            }
        }

        for r in &e.restrictions {
            if let RestrictionKind::UnavailableRange(range) = &r.kind {
                if range.is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidTimeWindow,
                        format!("Employee '{}' has an empty restriction range", e.id),
                    ));
                }
            }
        }

        for rule in &e.permanent_rules {
            let window = match &rule.kind {
                PermanentRuleKind::FixedShift(w) | PermanentRuleKind::OnlyAvailable(w) => Some(w),
                PermanentRuleKind::NeverSchedule => None,
            };
            if window.is_some_and(|w| w.is_empty()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeWindow,
                    format!("Employee '{}' has a permanent rule with an empty window", e.id),
                ));
            }
        }
    }

    let mut slot_ids = HashSet::new();
    for day in &request.staffing.clone().normalize().days {
        for slot in &day.slots {
            if !slot_ids.insert(slot.id.clone()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate slot ID: {}", slot.id),
                ));
            }
            if slot.window.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeWindow,
                    format!("Slot '{}' ends at or before it starts", slot.id),
                ));
            }
            if slot.headcount == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptySlot,
                    format!("Slot '{}' demands zero headcount", slot.id),
                ));
            }
        }
    }

    for o in &request.overrides {
        if let Some(id) = o.employee_id() {
            if !employee_ids.contains(id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownEmployee,
                    format!("Override references unknown employee '{id}'"),
                ));
            }
        }
    }

    for lock in &request.locked {
        if !employee_ids.contains(lock.employee_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEmployee,
                format!(
                    "Locked shift '{}' references unknown employee '{}'",
                    lock.shift_id, lock.employee_id
                ),
            ));
        }
        if lock.window.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeWindow,
                format!("Locked shift '{}' has an empty window", lock.shift_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Deterministic weekly shift rostering for a single-location restaurant.
//!
//! Turns a weekly staffing template, an employee roster, and manager
//! overrides into a concrete `WeeklySchedule`: who works which shift on
//! which date, plus the conflicts and warnings a manager should review.
//! Generation is pure and deterministic; identical inputs always produce
//! an identical schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Employee`, `WeeklyStaffingNeeds`,
//!   `ScheduleOverride`, `Shift`, `WeeklySchedule`, `EngineConfig`
//! - **`time`**: Minute-of-day ranges and interval algebra
//! - **`evaluator`**: The "can E work S on D?" constraint predicate
//! - **`expand`**: Staffing template to concrete shift instances
//! - **`engine`**: The generation pipeline (`WeeklyScheduler`)
//! - **`validation`**: Input integrity checks (duplicate IDs, inverted
//!   ranges, unknown employee references)
//!
//! # Pipeline
//!
//! Expander, then precedence resolver (locked shifts, fixed permanent
//! rules, forced overrides, greedy fill), then the bartender coverage
//! gap-filler, then a final consistency and reporting sweep. Scheduling
//! problems never abort a run; they surface as typed conflicts and
//! warnings on the result.

pub mod engine;
pub mod evaluator;
pub mod expand;
pub mod models;
pub mod time;
pub mod validation;

pub use engine::{ScheduleRequest, WeeklyScheduler};
pub use models::{EngineConfig, WeeklySchedule};

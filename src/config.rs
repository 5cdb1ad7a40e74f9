//! Application-level configuration constants.

use crate::validation::Bounds;

// UI Behavior
pub const ERROR_DISMISS_MS: u32 = 5000;
pub const ABSENCE_STEP: f64 = 0.5;

// Persistence
pub const SETTINGS_KEY: &str = "velocity-calculator.settings";

// Default values for input fields
pub const DEFAULT_VELOCITY: f64 = 22.0;
pub const DEFAULT_DEV_COUNT: u32 = 3;
pub const DEFAULT_SPRINT_DAYS: f64 = 10.0;
pub const DEFAULT_BUILD_PCT: f64 = 80.0;

// Min/Max limits for input fields
pub const MIN_VELOCITY: f64 = 0.0;
pub const MAX_VELOCITY: f64 = 1000.0;
pub const MIN_DEV_COUNT: u32 = 1;
pub const MAX_DEV_COUNT: u32 = 50;
pub const MIN_SPRINT_DAYS: f64 = 1.0;
pub const MAX_SPRINT_DAYS: f64 = 30.0;
pub const MIN_BUILD_PCT: f64 = 0.0;
pub const MAX_BUILD_PCT: f64 = 100.0;

/// Field limits handed to the [`Validator`](crate::validation::Validator).
///
/// Absences have no entry here: their upper bound is the validated sprint
/// length, so it is only known once the rest of the form has been checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub velocity: Bounds,
    pub dev_count: Bounds,
    pub sprint_days: Bounds,
    pub build_percent: Bounds,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            velocity: Bounds::new(MIN_VELOCITY, MAX_VELOCITY),
            dev_count: Bounds::new(MIN_DEV_COUNT as f64, MAX_DEV_COUNT as f64),
            sprint_days: Bounds::new(MIN_SPRINT_DAYS, MAX_SPRINT_DAYS),
            build_percent: Bounds::new(MIN_BUILD_PCT, MAX_BUILD_PCT),
        }
    }
}

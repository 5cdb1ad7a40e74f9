//! Sprint capacity calculator.
//!
//! Turns a team's nominal velocity, size, sprint length and per-developer
//! absences into the story points it can actually commit to, split between
//! build work and technical work.
//!
//! Core modules:
//! - `validation`: field parsing and range checks
//! - `capacity`: the capacity arithmetic
//! - `roster`: per-developer absence rows
//! - `settings` / `storage`: remembered form values
//! - `form`: event handling tying the pieces together
//! - `presenter`: display text for a result

use std::collections::HashSet;
use wasm_bindgen::prelude::*;

pub mod capacity;
pub mod config;
pub mod form;
pub mod presenter;
pub mod roster;
pub mod settings;
pub mod storage;
pub mod validation;

pub use capacity::{compute, AbsenceRecord, CapacityResult, SprintConfig};
pub use form::{Field, FormController, FormDraft, FormEvent, Outcome, Report};
pub use settings::{PersistedSettings, SettingsStore};
pub use validation::{ValidationError, Validator};

/// Check a config and its absences against the default limits, then compute.
///
/// This is the path taken by [`compute_capacity`] for callers that hand over
/// already-typed values instead of form text.
pub fn checked_compute(
    config: &SprintConfig,
    absences: &[AbsenceRecord],
) -> Result<CapacityResult, ValidationError> {
    use validation::{
        check_absence, check_range as check, BUILD_PCT_LABEL, DEV_COUNT_LABEL, DEV_INDEX_LABEL,
        SPRINT_DAYS_LABEL, VELOCITY_LABEL,
    };

    let limits = crate::config::Limits::default();
    check(config.velocity, limits.velocity, VELOCITY_LABEL)?;
    check(config.developer_count as f64, limits.dev_count, DEV_COUNT_LABEL)?;
    check(config.sprint_days, limits.sprint_days, SPRINT_DAYS_LABEL)?;
    check(config.build_percent, limits.build_percent, BUILD_PCT_LABEL)?;

    let mut seen = HashSet::with_capacity(absences.len());
    for absence in absences {
        if absence.developer_index == 0 || absence.developer_index > config.developer_count {
            return Err(ValidationError::OutOfRange {
                label: DEV_INDEX_LABEL.to_string(),
                value: absence.developer_index as f64,
                min: 1.0,
                max: config.developer_count as f64,
            });
        }
        if !seen.insert(absence.developer_index) {
            return Err(ValidationError::DuplicateDeveloper {
                dev_index: absence.developer_index,
            });
        }
        check_absence(
            absence.days_absent,
            absence.developer_index,
            config.sprint_days,
        )?;
    }

    Ok(compute(config, absences))
}

/// JavaScript entry point for embedding the calculator in other pages.
///
/// # Arguments
/// * `config` - `{ velocity, developerCount, sprintDays, buildPercent }`
/// * `absences` - `[{ developerIndex, daysAbsent }, ...]`
///
/// # Returns
/// `{ adjustedCapacity, buildCapacity, techCapacity,
/// totalAbsenceDevEquivalent, lossRatio }`, or a rejected string describing
/// the first invalid field.
#[wasm_bindgen(js_name = computeCapacity)]
pub fn compute_capacity(config: JsValue, absences: JsValue) -> Result<JsValue, JsValue> {
    let config: SprintConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
    let absences: Vec<AbsenceRecord> = serde_wasm_bindgen::from_value(absences)
        .map_err(|e| JsValue::from_str(&format!("Invalid absences: {}", e)))?;

    let result = checked_compute(&config, &absences)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SprintConfig {
        SprintConfig {
            velocity: 22.0,
            developer_count: 3,
            sprint_days: 10.0,
            build_percent: 80.0,
        }
    }

    #[test]
    fn test_checked_compute_matches_compute() {
        let absences = [AbsenceRecord {
            developer_index: 2,
            days_absent: 5.0,
        }];
        assert_eq!(
            checked_compute(&config(), &absences),
            Ok(compute(&config(), &absences))
        );
    }

    #[test]
    fn test_checked_compute_rejects_long_absence() {
        let absences = [AbsenceRecord {
            developer_index: 1,
            days_absent: 12.0,
        }];
        let err = checked_compute(&config(), &absences).unwrap_err();
        assert_eq!(err.violated_bound(), Some(10.0));
        assert_eq!(err.to_string(), "Les absences doivent être entre 0 et 10 jours");
    }

    #[test]
    fn test_checked_compute_rejects_repeated_developer() {
        let cfg = SprintConfig {
            velocity: 10.0,
            developer_count: 1,
            sprint_days: 10.0,
            build_percent: 50.0,
        };
        let absence = AbsenceRecord {
            developer_index: 1,
            days_absent: 10.0,
        };
        assert!(checked_compute(&cfg, &[absence]).is_ok());

        let err = checked_compute(&cfg, &[absence, absence]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateDeveloper { dev_index: 1 });
        assert_eq!(err.to_string(), "Le Dev 1 a plusieurs absences");
    }

    #[test]
    fn test_checked_compute_rejects_unknown_developer() {
        let absences = [AbsenceRecord {
            developer_index: 4,
            days_absent: 1.0,
        }];
        assert!(checked_compute(&config(), &absences).is_err());
    }

    #[test]
    fn test_checked_compute_rejects_zero_sprint() {
        let mut cfg = config();
        cfg.sprint_days = 0.0;
        let err = checked_compute(&cfg, &[]).unwrap_err();
        assert_eq!(err.label(), validation::SPRINT_DAYS_LABEL);
    }
}

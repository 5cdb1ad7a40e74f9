//! Input validation for the capacity form.
//!
//! Every field arrives as the raw text of an `<input type="number">`. The
//! [`validate`] function turns that text into a number or a
//! [`ValidationError`] naming the field and the bound it broke. The
//! [`Validator`] applies it to a whole form, stopping at the first violation.

use crate::capacity::{AbsenceRecord, SprintConfig};
use crate::config::Limits;
use crate::form::{DefaultsDraft, FormDraft};
use crate::roster::AbsenceRow;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// Decimal numbers with either separator; no exponent, no inf/NaN.
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+([.,]\d*)?|[.,]\d+)$").unwrap());

pub const VELOCITY_LABEL: &str = "La vélocité";
pub const DEV_COUNT_LABEL: &str = "Le nombre de développeurs";
pub const SPRINT_DAYS_LABEL: &str = "Les jours ouvrés";
pub const BUILD_PCT_LABEL: &str = "Le pourcentage build";
pub const ABSENCES_LABEL: &str = "Les absences";
pub const DEV_INDEX_LABEL: &str = "L'index du développeur";

const TEAM_LABELS: [&str; 4] = [
    VELOCITY_LABEL,
    DEV_COUNT_LABEL,
    SPRINT_DAYS_LABEL,
    BUILD_PCT_LABEL,
];
const DEFAULT_LABELS: [&str; 4] = [
    "La vélocité par défaut",
    "Le nombre de développeurs par défaut",
    "Les jours ouvrés par défaut",
    "Le pourcentage build par défaut",
];

/// Label used in errors about one developer's absence field.
pub fn absence_label(dev_index: u32) -> String {
    format!("L'absence du Dev {}", dev_index)
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was left empty.
    Missing { label: String },
    /// The text is not a plain decimal number.
    NotANumber { label: String, input: String },
    /// The field only takes whole numbers.
    NotWholeNumber { label: String, value: f64 },
    OutOfRange {
        label: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// An absence longer than the sprint, or negative.
    AbsenceOutOfRange { dev_index: u32, value: f64, max: f64 },
    /// More than one absence for the same developer.
    DuplicateDeveloper { dev_index: u32 },
}

impl ValidationError {
    pub fn label(&self) -> &str {
        match self {
            ValidationError::Missing { label }
            | ValidationError::NotANumber { label, .. }
            | ValidationError::NotWholeNumber { label, .. }
            | ValidationError::OutOfRange { label, .. } => label,
            ValidationError::AbsenceOutOfRange { .. } => ABSENCES_LABEL,
            ValidationError::DuplicateDeveloper { .. } => DEV_INDEX_LABEL,
        }
    }

    /// The bound the value fell outside of, for range errors.
    pub fn violated_bound(&self) -> Option<f64> {
        match self {
            ValidationError::OutOfRange { value, min, max, .. } => {
                Some(if value < min { *min } else { *max })
            }
            ValidationError::AbsenceOutOfRange { value, max, .. } => {
                Some(if *value < 0.0 { 0.0 } else { *max })
            }
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing { label } => write!(f, "{} est obligatoire", label),
            ValidationError::NotANumber { label, .. } => {
                write!(f, "{} doit être un nombre", label)
            }
            ValidationError::NotWholeNumber { label, .. } => {
                write!(f, "{} doit être un nombre entier", label)
            }
            ValidationError::OutOfRange { label, min, max, .. } => {
                write!(f, "{} doit être entre {} et {}", label, min, max)
            }
            ValidationError::AbsenceOutOfRange { max, .. } => {
                write!(f, "Les absences doivent être entre 0 et {} jours", max)
            }
            ValidationError::DuplicateDeveloper { dev_index } => {
                write!(f, "Le Dev {} a plusieurs absences", dev_index)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a decimal number typed with either `.` or `,` as separator.
///
/// Returns `None` for anything else, including exponents and non-finite
/// values.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if !NUMBER_REGEX.is_match(trimmed) {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Validate one field.
///
/// An absent or blank value fails when `required`, and otherwise counts as
/// zero before the range check.
pub fn validate(
    value: Option<&str>,
    bounds: Bounds,
    label: &str,
    required: bool,
) -> Result<f64, ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    let number = if trimmed.is_empty() {
        if required {
            return Err(ValidationError::Missing {
                label: label.to_string(),
            });
        }
        0.0
    } else {
        parse_number(trimmed).ok_or_else(|| ValidationError::NotANumber {
            label: label.to_string(),
            input: trimmed.to_string(),
        })?
    };

    check_range(number, bounds, label)
}

/// Range check for a value that is already a number.
pub fn check_range(value: f64, bounds: Bounds, label: &str) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            label: label.to_string(),
            input: value.to_string(),
        });
    }
    if !bounds.contains(value) {
        return Err(ValidationError::OutOfRange {
            label: label.to_string(),
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(value)
}

/// Range check for one developer's absence, already parsed.
pub fn check_absence(
    days_absent: f64,
    dev_index: u32,
    sprint_days: f64,
) -> Result<f64, ValidationError> {
    check_range(days_absent, Bounds::new(0.0, sprint_days), &absence_label(dev_index)).map_err(
        |e| match e {
            ValidationError::OutOfRange { value, max, .. } => ValidationError::AbsenceOutOfRange {
                dev_index,
                value,
                max,
            },
            other => other,
        },
    )
}

/// Validates form fields against a fixed set of [`Limits`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: Limits,
}

impl Validator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn validate_dev_count(&self, input: &str) -> Result<u32, ValidationError> {
        self.whole_count(input, DEV_COUNT_LABEL)
    }

    /// Check the four team fields, in form order, and build the config.
    pub fn validate_config(&self, draft: &FormDraft) -> Result<SprintConfig, ValidationError> {
        self.check_team(
            [
                draft.velocity.as_str(),
                draft.dev_count.as_str(),
                draft.sprint_days.as_str(),
                draft.build_percent.as_str(),
            ],
            TEAM_LABELS,
        )
    }

    /// Check the default values, blanks replaced by the built-in ones.
    pub fn validate_defaults(
        &self,
        defaults: &DefaultsDraft,
    ) -> Result<SprintConfig, ValidationError> {
        let filled = defaults.filled();
        self.check_team(
            [
                filled.velocity.as_str(),
                filled.dev_count.as_str(),
                filled.sprint_days.as_str(),
                filled.build_percent.as_str(),
            ],
            DEFAULT_LABELS,
        )
    }

    fn whole_count(&self, input: &str, label: &str) -> Result<u32, ValidationError> {
        let count = validate(Some(input), self.limits.dev_count, label, true)?;
        if count.fract() != 0.0 {
            return Err(ValidationError::NotWholeNumber {
                label: label.to_string(),
                value: count,
            });
        }
        Ok(count as u32)
    }

    fn check_team(
        &self,
        [velocity, dev_count, sprint_days, build_percent]: [&str; 4],
        labels: [&str; 4],
    ) -> Result<SprintConfig, ValidationError> {
        let velocity = validate(Some(velocity), self.limits.velocity, labels[0], true)?;
        let developer_count = self.whole_count(dev_count, labels[1])?;
        let sprint_days = validate(Some(sprint_days), self.limits.sprint_days, labels[2], true)?;
        let build_percent = validate(
            Some(build_percent),
            self.limits.build_percent,
            labels[3],
            true,
        )?;

        Ok(SprintConfig {
            velocity,
            developer_count,
            sprint_days,
            build_percent,
        })
    }

    /// Check every absence row against the already validated sprint length.
    pub fn validate_absences(
        &self,
        rows: &[AbsenceRow],
        sprint_days: f64,
    ) -> Result<Vec<AbsenceRecord>, ValidationError> {
        // Parse with an open range; the sprint bound is applied by check_absence.
        let any = Bounds::new(f64::NEG_INFINITY, f64::INFINITY);
        rows.iter()
            .map(|row| {
                let label = absence_label(row.dev_index);
                let parsed = validate(Some(&row.text), any, &label, false)?;
                let days_absent = check_absence(parsed, row.dev_index, sprint_days)?;
                Ok(AbsenceRecord {
                    developer_index: row.dev_index,
                    days_absent,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;

    fn draft(velocity: &str, dev_count: &str, sprint_days: &str, build: &str) -> FormDraft {
        FormDraft {
            velocity: velocity.to_string(),
            dev_count: dev_count.to_string(),
            sprint_days: sprint_days.to_string(),
            build_percent: build.to_string(),
            ..FormDraft::default()
        }
    }

    #[test]
    fn test_parse_number_accepts_both_separators() {
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number(" 10 "), Some(10.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
    }

    #[test]
    fn test_parse_number_rejects_non_decimal_text() {
        assert_eq!(parse_number("1e3"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_validate_required_blank_is_missing() {
        let err = validate(Some("  "), Bounds::new(0.0, 10.0), "La vélocité", true).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Missing {
                label: "La vélocité".to_string()
            }
        );
        assert!(validate(None, Bounds::new(0.0, 10.0), "x", true).is_err());
    }

    #[test]
    fn test_validate_optional_blank_counts_as_zero() {
        assert_eq!(validate(None, Bounds::new(0.0, 10.0), "x", false), Ok(0.0));
        assert_eq!(validate(Some(""), Bounds::new(0.0, 10.0), "x", false), Ok(0.0));
    }

    #[test]
    fn test_validate_bounds_are_inclusive() {
        let bounds = Bounds::new(1.0, 30.0);
        assert_eq!(validate(Some("1"), bounds, "x", true), Ok(1.0));
        assert_eq!(validate(Some("30"), bounds, "x", true), Ok(30.0));
        let err = validate(Some("30.5"), bounds, "x", true).unwrap_err();
        assert_eq!(err.violated_bound(), Some(30.0));
        let err = validate(Some("0"), bounds, "x", true).unwrap_err();
        assert_eq!(err.violated_bound(), Some(1.0));
    }

    #[test]
    fn test_error_messages() {
        let err = validate(Some("1200"), Bounds::new(0.0, 1000.0), VELOCITY_LABEL, true).unwrap_err();
        assert_eq!(err.to_string(), "La vélocité doit être entre 0 et 1000");
        assert_eq!(err.label(), VELOCITY_LABEL);

        let err = validate(Some("abc"), Bounds::new(0.0, 1000.0), VELOCITY_LABEL, true).unwrap_err();
        assert_eq!(err.to_string(), "La vélocité doit être un nombre");
        assert_eq!(err.violated_bound(), None);
    }

    #[test]
    fn test_dev_count_must_be_whole() {
        let validator = Validator::default();
        assert_eq!(validator.validate_dev_count("4"), Ok(4));
        assert_eq!(validator.validate_dev_count("4.0"), Ok(4));
        assert!(matches!(
            validator.validate_dev_count("2.5"),
            Err(ValidationError::NotWholeNumber { .. })
        ));
        assert!(matches!(
            validator.validate_dev_count("51"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validator.validate_dev_count("0"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_config_reports_first_violation_only() {
        let validator = Validator::default();
        // Both velocity and build percent are wrong; velocity comes first.
        let err = validator
            .validate_config(&draft("-1", "3", "10", "150"))
            .unwrap_err();
        assert_eq!(err.label(), VELOCITY_LABEL);

        let err = validator
            .validate_config(&draft("22", "3", "31", "150"))
            .unwrap_err();
        assert_eq!(err.label(), SPRINT_DAYS_LABEL);
    }

    #[test]
    fn test_validate_config_success() {
        let config = Validator::default()
            .validate_config(&draft("22", "3", "10", "80"))
            .unwrap();
        assert_eq!(
            config,
            SprintConfig {
                velocity: 22.0,
                developer_count: 3,
                sprint_days: 10.0,
                build_percent: 80.0,
            }
        );
    }

    #[test]
    fn test_custom_limits_are_honoured() {
        let limits = Limits {
            velocity: Bounds::new(0.0, 50.0),
            ..Limits::default()
        };
        let validator = Validator::new(limits);
        assert!(validator
            .validate_config(&draft("60", "3", "10", "80"))
            .is_err());
        assert_eq!(validator.limits().velocity.max, 50.0);
    }

    #[test]
    fn test_absence_above_sprint_days_rejected() {
        let mut roster = Roster::regenerate(2);
        roster.set(1, "10");
        roster.set(2, "12");
        let err = Validator::default()
            .validate_absences(roster.rows(), 10.0)
            .unwrap_err();
        assert_eq!(err.to_string(), "Les absences doivent être entre 0 et 10 jours");
        assert_eq!(
            err,
            ValidationError::AbsenceOutOfRange {
                dev_index: 2,
                value: 12.0,
                max: 10.0
            }
        );
        assert_eq!(err.violated_bound(), Some(10.0));
    }

    #[test]
    fn test_negative_absence_rejected() {
        let mut roster = Roster::regenerate(1);
        roster.set(1, "-1");
        let err = Validator::default()
            .validate_absences(roster.rows(), 7.5)
            .unwrap_err();
        assert_eq!(err.to_string(), "Les absences doivent être entre 0 et 7.5 jours");
        assert_eq!(err.violated_bound(), Some(0.0));
        assert_eq!(err.label(), ABSENCES_LABEL);
    }

    #[test]
    fn test_unparseable_absence_names_the_developer() {
        let mut roster = Roster::regenerate(2);
        roster.set(2, "deux");
        let err = Validator::default()
            .validate_absences(roster.rows(), 10.0)
            .unwrap_err();
        assert_eq!(err.to_string(), "L'absence du Dev 2 doit être un nombre");
    }

    #[test]
    fn test_blank_defaults_use_built_in_values() {
        let defaults = DefaultsDraft {
            velocity: String::new(),
            dev_count: " ".to_string(),
            sprint_days: String::new(),
            build_percent: String::new(),
        };
        let config = Validator::default().validate_defaults(&defaults).unwrap();
        assert_eq!(
            config,
            SprintConfig {
                velocity: 22.0,
                developer_count: 3,
                sprint_days: 10.0,
                build_percent: 80.0,
            }
        );
    }

    #[test]
    fn test_out_of_range_default_is_named() {
        let defaults = DefaultsDraft {
            sprint_days: "45".to_string(),
            ..DefaultsDraft::default()
        };
        let err = Validator::default().validate_defaults(&defaults).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Les jours ouvrés par défaut doit être entre 1 et 30"
        );
    }

    #[test]
    fn test_sprint_days_message() {
        let err = Validator::default()
            .validate_config(&draft("22", "3", "", "80"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Les jours ouvrés est obligatoire");
    }

    #[test]
    fn test_blank_absence_is_zero() {
        let mut roster = Roster::regenerate(2);
        roster.set(1, "");
        roster.set(2, "2,5");
        let records = Validator::default()
            .validate_absences(roster.rows(), 10.0)
            .unwrap();
        assert_eq!(records[0].days_absent, 0.0);
        assert_eq!(records[1].days_absent, 2.5);
        assert_eq!(records[1].developer_index, 2);
    }
}

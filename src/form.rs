//! Form state and the event handling behind the page.
//!
//! [`FormController`] is the only place where validation, calculation and
//! persistence meet. The UI forwards each user event as a [`FormEvent`] and
//! renders from [`FormController::draft`] plus the returned [`Outcome`].

use crate::capacity::{compute, AbsenceRecord, CapacityResult, SprintConfig};
use crate::config::{
    DEFAULT_BUILD_PCT, DEFAULT_DEV_COUNT, DEFAULT_SPRINT_DAYS, DEFAULT_VELOCITY, MAX_DEV_COUNT,
};
use crate::roster::Roster;
use crate::settings::{PersistedSettings, SavedDefaults, SettingsStore};
use crate::storage::KeyValueStore;
use crate::validation::{parse_number, ValidationError, Validator};
use log::{debug, info};

/// Raw text of every field, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub velocity: String,
    pub dev_count: String,
    pub sprint_days: String,
    pub build_percent: String,
    pub roster: Roster,
    pub remember: bool,
    pub defaults: DefaultsDraft,
}

impl Default for FormDraft {
    fn default() -> Self {
        let defaults = DefaultsDraft::default();
        Self {
            velocity: defaults.velocity.clone(),
            dev_count: defaults.dev_count.clone(),
            sprint_days: defaults.sprint_days.clone(),
            build_percent: defaults.build_percent.clone(),
            roster: Roster::regenerate(DEFAULT_DEV_COUNT),
            remember: false,
            defaults,
        }
    }
}

/// Raw text of the editable default values.
///
/// A blank field falls back to the built-in default when applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsDraft {
    pub velocity: String,
    pub dev_count: String,
    pub sprint_days: String,
    pub build_percent: String,
}

impl Default for DefaultsDraft {
    fn default() -> Self {
        Self::from_saved(&SavedDefaults::default())
    }
}

impl DefaultsDraft {
    pub fn from_saved(saved: &SavedDefaults) -> Self {
        Self {
            velocity: saved.default_velocity.to_string(),
            dev_count: saved.default_dev_count.to_string(),
            sprint_days: saved.default_sprint_days.to_string(),
            build_percent: saved.default_build_percent.to_string(),
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Velocity => &mut self.velocity,
            Field::DevCount => &mut self.dev_count,
            Field::SprintDays => &mut self.sprint_days,
            Field::BuildPercent => &mut self.build_percent,
        }
    }

    /// Copy with every blank field replaced by its built-in default.
    pub fn filled(&self) -> Self {
        let builtin = Self::default();
        let pick = |text: &String, fallback: String| {
            if text.trim().is_empty() {
                fallback
            } else {
                text.clone()
            }
        };
        Self {
            velocity: pick(&self.velocity, builtin.velocity),
            dev_count: pick(&self.dev_count, builtin.dev_count),
            sprint_days: pick(&self.sprint_days, builtin.sprint_days),
            build_percent: pick(&self.build_percent, builtin.build_percent),
        }
    }

    /// Lenient conversion for storage; unparseable fields keep the built-in value.
    fn to_saved(&self) -> SavedDefaults {
        let filled = self.filled();
        SavedDefaults {
            default_velocity: parse_number(&filled.velocity).unwrap_or(DEFAULT_VELOCITY),
            default_dev_count: parse_number(&filled.dev_count)
                .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                .map_or(DEFAULT_DEV_COUNT, |n| n as u32),
            default_sprint_days: parse_number(&filled.sprint_days).unwrap_or(DEFAULT_SPRINT_DAYS),
            default_build_percent: parse_number(&filled.build_percent)
                .unwrap_or(DEFAULT_BUILD_PCT),
        }
    }
}

impl FormDraft {
    /// Rebuild a draft from a stored snapshot.
    pub fn restore(settings: &PersistedSettings) -> Self {
        // A tampered count still gets validated on calculate; only cap the rows.
        let mut roster = Roster::regenerate(settings.dev_count.min(MAX_DEV_COUNT));
        roster.reapply(&settings.absence_records());
        Self {
            velocity: settings.velocity.to_string(),
            dev_count: settings.dev_count.to_string(),
            sprint_days: settings.sprint_days.to_string(),
            build_percent: settings.build_percent.to_string(),
            roster,
            remember: settings.remember_settings,
            defaults: DefaultsDraft::from_saved(&settings.defaults),
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Velocity => &mut self.velocity,
            Field::DevCount => &mut self.dev_count,
            Field::SprintDays => &mut self.sprint_days,
            Field::BuildPercent => &mut self.build_percent,
        }
    }

    /// Snapshot for storage, without range checks.
    ///
    /// Returns `None` while a team field does not parse. Blank absences are
    /// stored as zero; unparseable ones are left out.
    pub fn snapshot(&self) -> Option<PersistedSettings> {
        let dev_count = parse_number(&self.dev_count)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0)
            .map(|n| n as u32)?;
        let config = SprintConfig {
            velocity: parse_number(&self.velocity)?,
            developer_count: dev_count,
            sprint_days: parse_number(&self.sprint_days)?,
            build_percent: parse_number(&self.build_percent)?,
        };
        let absences: Vec<AbsenceRecord> = self
            .roster
            .rows()
            .iter()
            .filter_map(|row| {
                let days_absent = if row.text.trim().is_empty() {
                    0.0
                } else {
                    parse_number(&row.text)?
                };
                Some(AbsenceRecord {
                    developer_index: row.dev_index,
                    days_absent,
                })
            })
            .collect();

        let mut settings = PersistedSettings::new(&config, &absences);
        settings.remember_settings = self.remember;
        settings.defaults = self.defaults.to_saved();
        Some(settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Velocity,
    DevCount,
    SprintDays,
    BuildPercent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Edit(Field, String),
    /// Edit one of the values the defaults button applies.
    EditDefault(Field, String),
    EditAbsence { dev_index: u32, text: String },
    SetRemember(bool),
    ApplyDefaults,
    Calculate,
}

/// Validated inputs together with their computed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub config: SprintConfig,
    pub absences: Vec<AbsenceRecord>,
    pub result: CapacityResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The draft changed; nothing to display.
    Updated,
    /// The developer count changed and the absence rows were rebuilt.
    RowsRegenerated,
    Computed(Report),
    Invalid(ValidationError),
}

pub struct FormController<S: KeyValueStore> {
    validator: Validator,
    store: SettingsStore<S>,
    draft: FormDraft,
}

impl<S: KeyValueStore> FormController<S> {
    /// Start from the remembered settings, or from defaults.
    pub fn new(validator: Validator, store: SettingsStore<S>) -> Self {
        let draft = store
            .load()
            .map(|settings| FormDraft::restore(&settings))
            .unwrap_or_default();
        Self {
            validator,
            store,
            draft,
        }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn handle(&mut self, event: FormEvent) -> Outcome {
        match event {
            FormEvent::Edit(Field::DevCount, text) => {
                self.draft.dev_count = text;
                match self.validator.validate_dev_count(&self.draft.dev_count) {
                    Ok(count) if count as usize == self.draft.roster.len() => {
                        self.persist();
                        Outcome::Updated
                    }
                    Ok(count) => {
                        self.regenerate_rows(count);
                        self.persist();
                        Outcome::RowsRegenerated
                    }
                    Err(e) => Outcome::Invalid(e),
                }
            }
            FormEvent::Edit(field, text) => {
                *self.draft.field_mut(field) = text;
                self.persist();
                Outcome::Updated
            }
            FormEvent::EditDefault(field, text) => {
                *self.draft.defaults.field_mut(field) = text;
                self.persist();
                Outcome::Updated
            }
            FormEvent::EditAbsence { dev_index, text } => {
                if self.draft.roster.set(dev_index, &text) {
                    self.persist();
                } else {
                    debug!("Ignoring edit for unknown developer row {}", dev_index);
                }
                Outcome::Updated
            }
            FormEvent::SetRemember(remember) => {
                self.draft.remember = remember;
                if remember {
                    self.persist();
                } else {
                    self.store.clear();
                }
                Outcome::Updated
            }
            FormEvent::ApplyDefaults => match self.validator.validate_defaults(&self.draft.defaults) {
                Ok(values) => {
                    self.draft.velocity = values.velocity.to_string();
                    self.draft.dev_count = values.developer_count.to_string();
                    self.draft.sprint_days = values.sprint_days.to_string();
                    self.draft.build_percent = values.build_percent.to_string();
                    self.regenerate_rows(values.developer_count);
                    self.persist();
                    Outcome::RowsRegenerated
                }
                Err(e) => Outcome::Invalid(e),
            },
            FormEvent::Calculate => match self.calculate() {
                Ok(report) => Outcome::Computed(report),
                Err(e) => Outcome::Invalid(e),
            },
        }
    }

    /// Validate the whole draft and compute its capacity.
    pub fn calculate(&self) -> Result<Report, ValidationError> {
        let config = self.validator.validate_config(&self.draft)?;
        let absences = self
            .validator
            .validate_absences(self.draft.roster.rows(), config.sprint_days)?;
        let result = compute(&config, &absences);
        info!(
            "Capacity for {} developers over {} days: {:.2} pts",
            config.developer_count, config.sprint_days, result.adjusted_capacity
        );
        Ok(Report {
            config,
            absences,
            result,
        })
    }

    /// Fresh rows for `count` developers, keeping only remembered values.
    fn regenerate_rows(&mut self, count: u32) {
        let mut roster = Roster::regenerate(count);
        if self.draft.remember {
            if let Some(saved) = self.store.load() {
                roster.reapply(&saved.absence_records());
            }
        }
        self.draft.roster = roster;
    }

    fn persist(&self) {
        if !self.draft.remember {
            return;
        }
        match self.draft.snapshot() {
            Some(settings) => self.store.save(&settings),
            None => debug!("Draft does not parse yet, not saving"),
        }
    }
}

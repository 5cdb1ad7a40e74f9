//! Sprint capacity arithmetic.

use serde::{Deserialize, Serialize};

/// Validated team and sprint parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintConfig {
    /// Nominal velocity in story points per sprint.
    pub velocity: f64,
    pub developer_count: u32,
    /// Working days in the sprint.
    pub sprint_days: f64,
    /// Share of capacity allocated to build work, 0..=100.
    pub build_percent: f64,
}

/// Days one developer is away during the sprint. Indices start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRecord {
    pub developer_index: u32,
    pub days_absent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityResult {
    pub adjusted_capacity: f64,
    pub build_capacity: f64,
    pub tech_capacity: f64,
    /// Sum of absences expressed in full-sprint developers.
    pub total_absence_dev_equivalent: f64,
    pub loss_ratio: f64,
}

/// Compute the capacity left after absences and split it build/tech.
///
/// Inputs are expected to be validated: `developer_count` and `sprint_days`
/// are at least 1. The loss ratio is not clamped, so absences exceeding the
/// team's sprint produce a negative adjusted capacity.
pub fn compute(config: &SprintConfig, absences: &[AbsenceRecord]) -> CapacityResult {
    let total_absence_dev_equivalent: f64 = absences
        .iter()
        .map(|a| a.days_absent / config.sprint_days)
        .sum();

    let loss_ratio = total_absence_dev_equivalent / config.developer_count as f64;
    let adjusted_capacity = config.velocity * (1.0 - loss_ratio);
    let build_capacity = adjusted_capacity * config.build_percent / 100.0;
    let tech_capacity = adjusted_capacity - build_capacity;

    CapacityResult {
        adjusted_capacity,
        build_capacity,
        tech_capacity,
        total_absence_dev_equivalent,
        loss_ratio,
    }
}

//! Per-developer absence rows.
//!
//! The roster is rebuilt from scratch whenever the developer count changes.
//! Saved absences are then reapplied in the same step, so nothing ever
//! waits for rows to appear.

use crate::capacity::AbsenceRecord;
use log::debug;

/// One absence input, holding the text exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceRow {
    pub dev_index: u32,
    pub text: String,
}

/// What [`Roster::reapply`] managed to place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReapplyReport {
    pub applied: usize,
    /// Saved indices with no matching row.
    pub missing: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    rows: Vec<AbsenceRow>,
}

impl Roster {
    /// Fresh rows `1..=dev_count`, all at zero absence.
    pub fn regenerate(dev_count: u32) -> Self {
        let rows = (1..=dev_count)
            .map(|dev_index| AbsenceRow {
                dev_index,
                text: "0".to_string(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[AbsenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace the text of one row. Returns `false` if no such row exists.
    pub fn set(&mut self, dev_index: u32, text: &str) -> bool {
        match self.rows.iter_mut().find(|r| r.dev_index == dev_index) {
            Some(row) => {
                row.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Copy saved absence values onto the matching rows.
    ///
    /// Records whose index is beyond the roster are skipped. Applying the
    /// same records twice leaves the roster unchanged.
    pub fn reapply(&mut self, saved: &[AbsenceRecord]) -> ReapplyReport {
        let mut report = ReapplyReport::default();
        for record in saved {
            if self.set(record.developer_index, &record.days_absent.to_string()) {
                report.applied += 1;
            } else {
                report.missing.push(record.developer_index);
            }
        }
        if !report.missing.is_empty() {
            debug!(
                "Dropped saved absences for developers {:?} (roster has {} rows)",
                report.missing,
                self.rows.len()
            );
        }
        report
    }
}

//! Rule-by-rule policy comparison.
//!
//! Pure: no I/O. Entries always come out in catalog declaration order so the
//! comparison report is deterministic across runs.

use crate::catalog::{CATALOG, RuleId};
use crate::state::{PolicyState, RuleValue};
use serde::Serialize;

/// One row of a comparison report.
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    pub rule: RuleId,
    /// Display label from the catalog.
    pub label: &'static str,
    pub current: RuleValue,
    pub desired: RuleValue,
    pub changed: bool,
}

/// Ordered comparison of two canonical policy states.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub entries: Vec<DiffEntry>,
    /// Whether any rule differs. When false, callers must treat the run as
    /// "nothing to do" and skip strategy selection entirely.
    pub any_changed: bool,
}

impl DiffReport {
    /// Iterate only the rows that differ.
    pub fn changed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|entry| entry.changed)
    }
}

/// Compare `current` against `desired`, rule by rule, in catalog order.
pub fn diff(current: &PolicyState, desired: &PolicyState) -> DiffReport {
    let entries: Vec<DiffEntry> = CATALOG
        .iter()
        .map(|spec| {
            let cur = current.get(spec.id);
            let want = desired.get(spec.id);
            DiffEntry {
                rule: spec.id,
                label: spec.label,
                current: cur,
                desired: want,
                changed: cur != want,
            }
        })
        .collect();
    let any_changed = entries.iter().any(|entry| entry.changed);
    DiffReport {
        entries,
        any_changed,
    }
}

//! Canonical policy state.
//!
//! A [`PolicyState`] is the fully-populated rule→value mapping both sides of
//! a comparison are normalized into: no rule is ever unset, and absence in
//! the remote document has already been resolved to a concrete value.

use crate::catalog::{CATALOG, RuleId, RuleSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The value of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// An on/off setting.
    Toggle(bool),
    /// A non-negative integer setting.
    Count(u32),
}

impl RuleValue {
    /// Whether this value represents an enabled toggle or a non-zero count.
    pub fn is_enabled(self) -> bool {
        match self {
            RuleValue::Toggle(on) => on,
            RuleValue::Count(n) => n > 0,
        }
    }
}

impl std::fmt::Display for RuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleValue::Toggle(true) => f.write_str("yes"),
            RuleValue::Toggle(false) => f.write_str("no"),
            RuleValue::Count(n) => write!(f, "{n}"),
        }
    }
}

/// A fully-populated, catalog-ordered policy state.
///
/// Construction goes through [`PolicyState::from_catalog`], so every catalog
/// rule has exactly one value. The required status-check contexts ride along
/// next to the rule map: they are not a rule, but the applier must not drop
/// them, or reapplying a target would not be idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    // Keyed by the declaration-ordered RuleId, so iteration is catalog order.
    values: BTreeMap<RuleId, RuleValue>,
    contexts: BTreeSet<String>,
}

impl PolicyState {
    /// Build a state by asking `value_for` for every catalog rule, in order.
    pub fn from_catalog(mut value_for: impl FnMut(&RuleSpec) -> RuleValue) -> Self {
        let values = CATALOG
            .iter()
            .map(|spec| (spec.id, value_for(spec)))
            .collect();
        Self {
            values,
            contexts: BTreeSet::new(),
        }
    }

    /// The value of a rule. Every catalog rule is present by construction.
    pub fn get(&self, id: RuleId) -> RuleValue {
        self.values[&id]
    }

    /// Replace the value of a rule.
    pub fn set(&mut self, id: RuleId, value: RuleValue) {
        self.values.insert(id, value);
    }

    /// Shorthand for a toggle rule's enabled state.
    pub fn enabled(&self, id: RuleId) -> bool {
        self.get(id).is_enabled()
    }

    /// Shorthand for a count rule's value; toggles read as 0/1.
    pub fn count(&self, id: RuleId) -> u32 {
        match self.get(id) {
            RuleValue::Count(n) => n,
            RuleValue::Toggle(on) => u32::from(on),
        }
    }

    /// Iterate `(rule, value)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, RuleValue)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }

    /// The required status-check contexts carried with this state.
    pub fn contexts(&self) -> &BTreeSet<String> {
        &self.contexts
    }

    /// Replace the carried status-check contexts.
    pub fn set_contexts(&mut self, contexts: impl IntoIterator<Item = String>) {
        self.contexts = contexts.into_iter().collect();
    }

    /// Builder-style variant of [`set_contexts`](Self::set_contexts).
    pub fn with_contexts(mut self, contexts: impl IntoIterator<Item = String>) -> Self {
        self.set_contexts(contexts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::desired_baseline;

    #[test]
    fn test_from_catalog_populates_every_rule() {
        let state = PolicyState::from_catalog(|spec| spec.desired);
        assert_eq!(state.iter().count(), CATALOG.len());
        for spec in CATALOG {
            assert_eq!(state.get(spec.id), spec.desired);
        }
    }

    #[test]
    fn test_iteration_is_catalog_order() {
        let state = desired_baseline();
        let order: Vec<RuleId> = state.iter().map(|(id, _)| id).collect();
        let expected: Vec<RuleId> = CATALOG.iter().map(|spec| spec.id).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_set_and_get() {
        let mut state = desired_baseline();
        state.set(RuleId::RequiredApprovingReviewCount, RuleValue::Count(3));
        assert_eq!(state.count(RuleId::RequiredApprovingReviewCount), 3);
        state.set(RuleId::LockBranch, RuleValue::Toggle(true));
        assert!(state.enabled(RuleId::LockBranch));
    }

    #[test]
    fn test_contexts_are_sorted_and_deduplicated() {
        let state = desired_baseline().with_contexts(vec![
            "ci/test".to_string(),
            "ci/build".to_string(),
            "ci/test".to_string(),
        ]);
        let contexts: Vec<&str> = state.contexts().iter().map(String::as_str).collect();
        assert_eq!(contexts, vec!["ci/build", "ci/test"]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(RuleValue::Toggle(true).to_string(), "yes");
        assert_eq!(RuleValue::Toggle(false).to_string(), "no");
        assert_eq!(RuleValue::Count(2).to_string(), "2");
    }
}

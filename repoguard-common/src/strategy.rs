//! Conflict-resolution strategies.
//!
//! Both strategies are pure functions from policy states to a policy state,
//! so they unit-test without a live remote. `overwrite` discards the current
//! configuration entirely; `merge` combines per rule and never produces a
//! result less secure than either input.

use crate::catalog::{CATALOG, RuleId, RuleSpec, SecurityDirection};
use crate::state::{PolicyState, RuleValue};
use std::str::FromStr;

/// How to resolve differences between the current and desired policy.
///
/// There is no default: the two strategies have materially different safety
/// guarantees, and picking one is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Replace the current configuration with the desired baseline.
    Overwrite,
    /// Combine per rule, keeping the stricter side of each.
    Merge,
}

impl Strategy {
    /// Compute the target state for this strategy.
    pub fn resolve(self, current: &PolicyState, desired: &PolicyState) -> PolicyState {
        match self {
            Strategy::Overwrite => overwrite(desired),
            Strategy::Merge => merge(current, desired),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Overwrite => f.write_str("overwrite"),
            Strategy::Merge => f.write_str("merge"),
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(Strategy::Overwrite),
            "merge" => Ok(Strategy::Merge),
            other => Err(UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

/// A strategy name that is neither `overwrite` nor `merge`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{value}': expected 'overwrite' or 'merge'")]
pub struct UnknownStrategy {
    pub value: String,
}

/// The overwrite strategy: the target is the desired state, independent of
/// whatever is currently configured.
pub fn overwrite(desired: &PolicyState) -> PolicyState {
    desired.clone()
}

/// The merge strategy: per-rule monotonic combination.
///
/// More-is-safer rules keep the stricter side (logical OR for toggles,
/// numeric max for counts); less-is-safer rules only stay permissive when
/// both sides permit (logical AND). Status-check contexts are unioned — a
/// required check is never removed. The pull-request requirement is pinned
/// on: it is foundational to the rest of the review rules.
pub fn merge(current: &PolicyState, desired: &PolicyState) -> PolicyState {
    let mut target =
        PolicyState::from_catalog(|spec| combine(spec, current.get(spec.id), desired.get(spec.id)));

    target.set(RuleId::RequirePullRequestReviews, RuleValue::Toggle(true));
    target.set_contexts(
        current
            .contexts()
            .iter()
            .chain(desired.contexts())
            .cloned(),
    );
    target
}

fn combine(spec: &RuleSpec, current: RuleValue, desired: RuleValue) -> RuleValue {
    match spec.direction {
        SecurityDirection::MoreIsSafer => match (current, desired) {
            (RuleValue::Toggle(a), RuleValue::Toggle(b)) => RuleValue::Toggle(a || b),
            (RuleValue::Count(a), RuleValue::Count(b)) => RuleValue::Count(a.max(b)),
            // Kind mismatches cannot arise from catalog-built states.
            (_, b) => b,
        },
        SecurityDirection::LessIsSafer => match (current, desired) {
            (RuleValue::Toggle(a), RuleValue::Toggle(b)) => RuleValue::Toggle(a && b),
            (RuleValue::Count(a), RuleValue::Count(b)) => RuleValue::Count(a.min(b)),
            (_, b) => b,
        },
    }
}

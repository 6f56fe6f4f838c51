//! The branch protection rule catalog.
//!
//! Every rule repoguard enforces is enumerated here, together with its value
//! kind, its security direction, and the fixed desired value. The catalog is
//! the single source of truth for rule ordering: diff reports and update
//! payloads always follow declaration order. New rules are added by extending
//! this table, never by inferring them from a remote document.

use crate::state::{PolicyState, RuleValue};
use serde::{Deserialize, Serialize};

/// Identifier for a single protection rule.
///
/// Declaration order is the catalog order; it is preserved across display
/// and apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    RequirePullRequestReviews,
    RequiredApprovingReviewCount,
    DismissStaleReviews,
    RequireCodeOwnerReviews,
    RequireLastPushApproval,
    RequiredStatusChecks,
    StrictStatusChecks,
    RequiredSignatures,
    EnforceAdmins,
    RequiredLinearHistory,
    RequiredConversationResolution,
    BlockCreations,
    LockBranch,
    AllowForcePushes,
    AllowDeletions,
    AllowForkSyncing,
}

impl RuleId {
    /// Look up this rule's catalog entry.
    pub fn spec(self) -> &'static RuleSpec {
        // The catalog covers every variant; the lookup cannot miss.
        CATALOG
            .iter()
            .find(|spec| spec.id == self)
            .expect("catalog covers every rule")
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().label)
    }
}

/// The shape of a rule's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// An on/off setting.
    Toggle,
    /// A non-negative integer setting.
    Count,
}

/// Which direction of a rule's value is the safer one.
///
/// Used by the merge strategy to combine current and desired values without
/// ever reducing security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityDirection {
    /// Enabled / higher is safer; merge keeps the stricter of the two.
    MoreIsSafer,
    /// Enabled is *less* safe (permissive toggles); merge only keeps the
    /// permission if both sides grant it.
    LessIsSafer,
}

/// A single catalog entry: identity, display label, value shape, security
/// direction, and the fixed desired value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub id: RuleId,
    /// Human-readable label used in diff tables.
    pub label: &'static str,
    pub kind: ValueKind,
    pub direction: SecurityDirection,
    /// The baseline value repoguard drives repositories toward.
    pub desired: RuleValue,
}

/// The full, ordered rule catalog.
pub const CATALOG: &[RuleSpec] = &[
    RuleSpec {
        id: RuleId::RequirePullRequestReviews,
        label: "Require pull request before merging",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(true),
    },
    RuleSpec {
        id: RuleId::RequiredApprovingReviewCount,
        label: "Required approving reviews",
        kind: ValueKind::Count,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Count(1),
    },
    RuleSpec {
        id: RuleId::DismissStaleReviews,
        label: "Dismiss stale reviews on new commits",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(true),
    },
    RuleSpec {
        id: RuleId::RequireCodeOwnerReviews,
        label: "Require review from code owners",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::RequireLastPushApproval,
        label: "Require approval of the most recent push",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::RequiredStatusChecks,
        label: "Require status checks to pass",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::StrictStatusChecks,
        label: "Require branches to be up to date",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::RequiredSignatures,
        label: "Require signed commits",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(true),
    },
    RuleSpec {
        id: RuleId::EnforceAdmins,
        label: "Include administrators",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(true),
    },
    RuleSpec {
        id: RuleId::RequiredLinearHistory,
        label: "Require linear history",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::RequiredConversationResolution,
        label: "Require conversation resolution",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(true),
    },
    RuleSpec {
        id: RuleId::BlockCreations,
        label: "Block branch creations",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::LockBranch,
        label: "Lock branch",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::MoreIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::AllowForcePushes,
        label: "Allow force pushes",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::LessIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::AllowDeletions,
        label: "Allow branch deletions",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::LessIsSafer,
        desired: RuleValue::Toggle(false),
    },
    RuleSpec {
        id: RuleId::AllowForkSyncing,
        label: "Allow fork syncing",
        kind: ValueKind::Toggle,
        direction: SecurityDirection::LessIsSafer,
        desired: RuleValue::Toggle(false),
    },
];

/// The fixed desired policy: every catalog rule at its baseline value, with
/// no required status-check contexts.
pub fn desired_baseline() -> PolicyState {
    PolicyState::from_catalog(|spec| spec.desired)
}

//! Policy application.
//!
//! Serializes a target [`PolicyState`] into the remote update payload and
//! issues the update. The signed-commits requirement cannot be set through
//! the main payload; it is driven separately through its own sub-resource
//! call, and a failure there is non-fatal because the main protections have
//! already taken effect.

use crate::catalog::RuleId;
use crate::errors::{ApplyWarning, ReconcileError};
use crate::remote::{
    ProtectionApi, ProtectionUpdate, PullRequestReviewsPayload, StatusChecksPayload,
};
use crate::state::PolicyState;
use crate::types::RepoId;
use tracing::{debug, warn};

/// Result of a successful apply.
#[derive(Debug)]
pub struct AppliedPolicy {
    /// The state that was applied (identical to the target).
    pub state: PolicyState,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<ApplyWarning>,
}

/// Serialize a target state into the primary update payload.
///
/// Sub-objects for disabled requirements are `None` (JSON `null`), never an
/// empty object — the remote treats those differently. The payload cannot
/// represent review settings without the pull-request block, but both
/// strategies keep that block on, so every strategy output is representable.
pub fn build_update(target: &PolicyState) -> ProtectionUpdate {
    let required_status_checks = target
        .enabled(RuleId::RequiredStatusChecks)
        .then(|| StatusChecksPayload {
            strict: target.enabled(RuleId::StrictStatusChecks),
            contexts: target.contexts().iter().cloned().collect(),
        });

    let required_pull_request_reviews = target
        .enabled(RuleId::RequirePullRequestReviews)
        .then(|| PullRequestReviewsPayload {
            dismiss_stale_reviews: target.enabled(RuleId::DismissStaleReviews),
            require_code_owner_reviews: target.enabled(RuleId::RequireCodeOwnerReviews),
            require_last_push_approval: target.enabled(RuleId::RequireLastPushApproval),
            required_approving_review_count: target.count(RuleId::RequiredApprovingReviewCount),
        });

    ProtectionUpdate {
        required_status_checks,
        enforce_admins: target.enabled(RuleId::EnforceAdmins),
        required_pull_request_reviews,
        restrictions: None,
        required_linear_history: target.enabled(RuleId::RequiredLinearHistory),
        allow_force_pushes: target.enabled(RuleId::AllowForcePushes),
        allow_deletions: target.enabled(RuleId::AllowDeletions),
        block_creations: target.enabled(RuleId::BlockCreations),
        required_conversation_resolution: target.enabled(RuleId::RequiredConversationResolution),
        lock_branch: target.enabled(RuleId::LockBranch),
        allow_fork_syncing: target.enabled(RuleId::AllowForkSyncing),
    }
}

/// Apply a target state to a branch.
///
/// Issues the primary update, then drives the signed-commits sub-resource to
/// the target value. On success returns the applied state for reporting.
///
/// # Errors
///
/// Returns [`ReconcileError::ApplyRejected`] when the primary update fails;
/// no partial state is assumed applied. A failing signature call after a
/// successful primary update is reported as a warning, not an error.
pub fn apply(
    api: &dyn ProtectionApi,
    repo: &RepoId,
    branch: &str,
    target: &PolicyState,
) -> Result<AppliedPolicy, ReconcileError> {
    let update = build_update(target);
    debug!(%repo, branch, "issuing protection update");
    api.apply_protection(repo, branch, &update)
        .map_err(|source| ReconcileError::ApplyRejected {
            repo: repo.clone(),
            source,
        })?;

    let mut warnings = Vec::new();
    let signatures = target.enabled(RuleId::RequiredSignatures);
    if let Err(source) = api.set_signature_requirement(repo, branch, signatures) {
        let warning = ApplyWarning::SignatureUpdateFailed {
            repo: repo.clone(),
            desired: signatures,
            source,
        };
        warn!(%repo, branch, "{warning}");
        warnings.push(warning);
    }

    Ok(AppliedPolicy {
        state: target.clone(),
        warnings,
    })
}

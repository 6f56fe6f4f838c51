//! State normalization.
//!
//! Maps the sparse remote document (plus the separately-fetched signature
//! requirement) into a fully-populated [`PolicyState`]. Absence means
//! disabled/zero: a missing sub-block normalizes every rule nested under it
//! to its least-protective value, and a missing leaf boolean or count reads
//! as `false` / `0`.

use crate::catalog::RuleId;
use crate::errors::{ReconcileError, RemoteCall};
use crate::remote::{EnabledFlag, ProtectionApi, ProtectionDocument};
use crate::state::{PolicyState, RuleValue};
use crate::types::RepoId;

fn flag(field: Option<&EnabledFlag>) -> bool {
    field.map(|f| f.enabled).unwrap_or(false)
}

/// Normalize a possibly-absent protection document into canonical form.
///
/// `signatures_required` is the value of the signed-commits sub-resource,
/// which the remote keeps outside the main document; [`observe`] folds it in
/// so callers never see that split.
pub fn normalize(doc: Option<&ProtectionDocument>, signatures_required: bool) -> PolicyState {
    let empty = ProtectionDocument::default();
    let doc = doc.unwrap_or(&empty);

    let reviews = doc.required_pull_request_reviews.as_ref();
    let checks = doc.required_status_checks.as_ref();

    let mut state = PolicyState::from_catalog(|spec| match spec.id {
        RuleId::RequirePullRequestReviews => RuleValue::Toggle(reviews.is_some()),
        RuleId::RequiredApprovingReviewCount => RuleValue::Count(
            reviews
                .map(|r| r.required_approving_review_count)
                .unwrap_or(0),
        ),
        RuleId::DismissStaleReviews => {
            RuleValue::Toggle(reviews.map(|r| r.dismiss_stale_reviews).unwrap_or(false))
        }
        RuleId::RequireCodeOwnerReviews => RuleValue::Toggle(
            reviews
                .map(|r| r.require_code_owner_reviews)
                .unwrap_or(false),
        ),
        RuleId::RequireLastPushApproval => RuleValue::Toggle(
            reviews
                .map(|r| r.require_last_push_approval)
                .unwrap_or(false),
        ),
        RuleId::RequiredStatusChecks => RuleValue::Toggle(checks.is_some()),
        RuleId::StrictStatusChecks => {
            RuleValue::Toggle(checks.map(|c| c.strict).unwrap_or(false))
        }
        RuleId::RequiredSignatures => RuleValue::Toggle(signatures_required),
        RuleId::EnforceAdmins => RuleValue::Toggle(flag(doc.enforce_admins.as_ref())),
        RuleId::RequiredLinearHistory => {
            RuleValue::Toggle(flag(doc.required_linear_history.as_ref()))
        }
        RuleId::RequiredConversationResolution => {
            RuleValue::Toggle(flag(doc.required_conversation_resolution.as_ref()))
        }
        RuleId::BlockCreations => RuleValue::Toggle(flag(doc.block_creations.as_ref())),
        RuleId::LockBranch => RuleValue::Toggle(flag(doc.lock_branch.as_ref())),
        RuleId::AllowForcePushes => RuleValue::Toggle(flag(doc.allow_force_pushes.as_ref())),
        RuleId::AllowDeletions => RuleValue::Toggle(flag(doc.allow_deletions.as_ref())),
        RuleId::AllowForkSyncing => RuleValue::Toggle(flag(doc.allow_fork_syncing.as_ref())),
    });

    if let Some(checks) = checks {
        state.set_contexts(checks.contexts.iter().cloned());
    }
    state
}

/// Fetch and normalize the current protection state for a branch.
///
/// Performs the main protection fetch and, when protection exists, the
/// secondary signature-requirement lookup. An unprotected branch has no
/// signature sub-resource; it normalizes to `false` without a second call.
///
/// # Errors
///
/// Returns [`ReconcileError::RemoteStateUnavailable`] when either fetch fails
/// for reasons other than the legitimate "no protection configured" state.
pub fn observe(
    api: &dyn ProtectionApi,
    repo: &RepoId,
    branch: &str,
) -> Result<PolicyState, ReconcileError> {
    let doc = api.fetch_protection(repo, branch).map_err(|source| {
        ReconcileError::RemoteStateUnavailable {
            repo: repo.clone(),
            call: RemoteCall::Protection,
            source,
        }
    })?;

    let signatures = match &doc {
        Some(_) => api
            .fetch_signature_requirement(repo, branch)
            .map_err(|source| ReconcileError::RemoteStateUnavailable {
                repo: repo.clone(),
                call: RemoteCall::SignatureRequirement,
                source,
            })?,
        None => false,
    };

    Ok(normalize(doc.as_ref(), signatures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::remote::{PullRequestReviewsBlock, StatusChecksBlock};

    #[test]
    fn test_absent_document_normalizes_to_all_disabled() {
        let state = normalize(None, false);
        for spec in CATALOG {
            assert_eq!(
                state.get(spec.id),
                match spec.desired {
                    RuleValue::Toggle(_) => RuleValue::Toggle(false),
                    RuleValue::Count(_) => RuleValue::Count(0),
                },
                "rule {:?} should normalize to its zero value",
                spec.id
            );
        }
        assert!(state.contexts().is_empty());
    }

    #[test]
    fn test_absent_review_block_normalizes_nested_rules() {
        let doc = ProtectionDocument {
            enforce_admins: Some(EnabledFlag::new(true)),
            ..Default::default()
        };
        let state = normalize(Some(&doc), false);
        assert!(!state.enabled(RuleId::RequirePullRequestReviews));
        assert_eq!(state.count(RuleId::RequiredApprovingReviewCount), 0);
        assert!(!state.enabled(RuleId::DismissStaleReviews));
        assert!(!state.enabled(RuleId::RequireCodeOwnerReviews));
        assert!(!state.enabled(RuleId::RequireLastPushApproval));
        // The block that *is* present still reads through.
        assert!(state.enabled(RuleId::EnforceAdmins));
    }

    #[test]
    fn test_present_review_block_reads_fields_with_defaults() {
        let doc = ProtectionDocument {
            required_pull_request_reviews: Some(PullRequestReviewsBlock {
                required_approving_review_count: 2,
                dismiss_stale_reviews: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let state = normalize(Some(&doc), false);
        assert!(state.enabled(RuleId::RequirePullRequestReviews));
        assert_eq!(state.count(RuleId::RequiredApprovingReviewCount), 2);
        assert!(state.enabled(RuleId::DismissStaleReviews));
        assert!(!state.enabled(RuleId::RequireCodeOwnerReviews));
    }

    #[test]
    fn test_status_checks_capture_strict_and_contexts() {
        let doc = ProtectionDocument {
            required_status_checks: Some(StatusChecksBlock {
                strict: true,
                contexts: vec!["ci/test".to_string(), "ci/build".to_string()],
            }),
            ..Default::default()
        };
        let state = normalize(Some(&doc), false);
        assert!(state.enabled(RuleId::RequiredStatusChecks));
        assert!(state.enabled(RuleId::StrictStatusChecks));
        assert_eq!(state.contexts().len(), 2);
    }

    #[test]
    fn test_signature_requirement_is_folded_in() {
        let doc = ProtectionDocument::default();
        assert!(normalize(Some(&doc), true).enabled(RuleId::RequiredSignatures));
        assert!(!normalize(Some(&doc), false).enabled(RuleId::RequiredSignatures));
    }

    #[test]
    fn test_present_with_zero_equals_absent() {
        // "Present with value 0" must not be distinguishable from "absent".
        let explicit = ProtectionDocument {
            required_pull_request_reviews: None,
            allow_force_pushes: Some(EnabledFlag::new(false)),
            ..Default::default()
        };
        assert_eq!(normalize(Some(&explicit), false), normalize(None, false));
    }
}

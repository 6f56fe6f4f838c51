//! End-to-end reconciliation scenarios against the mock remote.
//!
//! These walk the full fetch → normalize → diff → strategy → apply pipeline
//! and check the engine's externally observable guarantees: idempotent
//! applies, monotonic merges, no-op detection, and partial-apply warnings.

use repoguard_common::{
    ApiError, ApplyWarning, MockProtectionApi, Outcome, ProtectionDocument, RepoId, RuleId,
    RuleValue, Strategy, desired_baseline, diff_only, observe, reconcile,
};
use repoguard_common::remote::{EnabledFlag, PullRequestReviewsBlock};

fn repo() -> RepoId {
    "octocat/hello-world".parse().unwrap()
}

// ---------------------------------------------------------------------------
// Scenario A: no protection at all, overwrite to baseline
// ---------------------------------------------------------------------------

#[test]
fn unprotected_branch_overwrites_to_exact_baseline() {
    let api = MockProtectionApi::unprotected();

    let report = reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap();

    // Every rule whose baseline is non-default shows as changed.
    assert!(report.diff.any_changed);
    for entry in &report.diff.entries {
        assert_eq!(entry.changed, entry.desired.is_enabled());
    }

    match report.outcome {
        Outcome::Applied { state, .. } => assert_eq!(state, desired_baseline()),
        other => panic!("expected apply, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario B: merge keeps the stricter review settings from each side
// ---------------------------------------------------------------------------

#[test]
fn merge_keeps_stricter_review_count_and_dismissal() {
    // current: 2 approvals required, stale reviews kept
    // desired: 1 approval, stale reviews dismissed
    let api = MockProtectionApi::with_document(ProtectionDocument {
        required_pull_request_reviews: Some(PullRequestReviewsBlock {
            required_approving_review_count: 2,
            dismiss_stale_reviews: false,
            ..Default::default()
        }),
        ..Default::default()
    });

    let report = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap();
    match report.outcome {
        Outcome::Applied { state, .. } => {
            assert_eq!(state.count(RuleId::RequiredApprovingReviewCount), 2);
            assert!(state.enabled(RuleId::DismissStaleReviews));
        }
        other => panic!("expected apply, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario C: merge never re-permits force pushes
// ---------------------------------------------------------------------------

#[test]
fn merge_disables_force_pushes_when_desired_does() {
    let api = MockProtectionApi::with_document(ProtectionDocument {
        allow_force_pushes: Some(EnabledFlag::new(true)),
        ..Default::default()
    });

    let report = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap();
    match report.outcome {
        Outcome::Applied { state, .. } => {
            assert!(!state.enabled(RuleId::AllowForcePushes));
        }
        other => panic!("expected apply, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario D: current equals desired, nothing is applied
// ---------------------------------------------------------------------------

#[test]
fn matching_state_reports_no_changes_and_skips_apply() {
    let api = MockProtectionApi::unprotected();
    // First run brings the branch to the baseline.
    reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap();
    let applies = api.apply_calls();

    let report = reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap();
    assert!(matches!(report.outcome, Outcome::NoChangeNeeded));
    assert!(!report.diff.any_changed);
    assert_eq!(api.apply_calls(), applies, "no further update may be issued");
}

// ---------------------------------------------------------------------------
// Scenario E: signature sub-resource failure is a warning, not a failure
// ---------------------------------------------------------------------------

#[test]
fn signature_failure_yields_warning_but_overall_success() {
    let api = MockProtectionApi::unprotected().failing_signature_update(ApiError::Status {
        status: 500,
        endpoint: "/required_signatures".to_string(),
        message: "server error".to_string(),
    });

    let report = reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap();
    match report.outcome {
        Outcome::Applied { warnings, .. } => {
            assert_eq!(warnings.len(), 1);
            assert!(matches!(
                warnings[0],
                ApplyWarning::SignatureUpdateFailed { .. }
            ));
        }
        other => panic!("expected apply, got {other:?}"),
    }
    assert_eq!(api.apply_calls(), 1);
}

// ---------------------------------------------------------------------------
// Idempotence: apply, re-fetch, no further diff
// ---------------------------------------------------------------------------

#[test]
fn overwrite_apply_is_idempotent_under_refetch() {
    let api = MockProtectionApi::unprotected();
    reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap();

    // Re-fetching and normalizing reproduces the applied target exactly.
    let observed = observe(&api, &repo(), "main").unwrap();
    assert_eq!(observed, desired_baseline());

    // And the preview path agrees there is nothing left to do.
    let report = diff_only(&api, &repo(), "main").unwrap();
    assert!(!report.any_changed);
}

#[test]
fn merge_apply_converges_in_one_step() {
    let api = MockProtectionApi::with_document(ProtectionDocument {
        required_pull_request_reviews: Some(PullRequestReviewsBlock {
            required_approving_review_count: 3,
            ..Default::default()
        }),
        allow_force_pushes: Some(EnabledFlag::new(true)),
        ..Default::default()
    })
    .with_signatures(true);

    let first = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap();
    let applied = match first.outcome {
        Outcome::Applied { state, .. } => state,
        other => panic!("expected apply, got {other:?}"),
    };
    assert_eq!(applied.count(RuleId::RequiredApprovingReviewCount), 3);

    // A second merge run observes the applied state and has nothing to do:
    // the stricter current values all survive into the merge target.
    let second = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap();
    match second.outcome {
        Outcome::NoChangeNeeded => {}
        Outcome::Applied { state, .. } => {
            // Merge may legitimately report a diff against the *baseline*
            // while still converging to the same target.
            assert_eq!(state, applied);
        }
    }
    assert_eq!(observe(&api, &repo(), "main").unwrap(), applied);
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

#[test]
fn signature_fetch_failure_is_remote_state_unavailable() {
    let api = MockProtectionApi::with_document(ProtectionDocument::default())
        .failing_signature_fetch(ApiError::Transport {
            endpoint: "/required_signatures".to_string(),
            message: "timed out".to_string(),
        });

    let err = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("octocat/hello-world"));
    assert!(text.contains("signature requirement"));
    assert_eq!(api.apply_calls(), 0);
}

#[test]
fn rejected_update_reports_apply_rejected() {
    let api = MockProtectionApi::unprotected().failing_apply(ApiError::Status {
        status: 403,
        endpoint: "/protection".to_string(),
        message: "Resource not accessible by integration".to_string(),
    });

    let err = reconcile(&api, &repo(), "main", Strategy::Overwrite).unwrap_err();
    assert!(err.to_string().contains("rejected"));
    // The signature call must not run after a rejected primary update.
    assert_eq!(api.signature_calls(), 0);
}

// ---------------------------------------------------------------------------
// Mixed detail: an absent review block merges like an explicit zero
// ---------------------------------------------------------------------------

#[test]
fn absent_review_block_is_raised_to_desired_count() {
    let api = MockProtectionApi::with_document(ProtectionDocument {
        enforce_admins: Some(EnabledFlag::new(true)),
        ..Default::default()
    });

    let report = reconcile(&api, &repo(), "main", Strategy::Merge).unwrap();
    match report.outcome {
        Outcome::Applied { state, .. } => {
            assert!(state.enabled(RuleId::RequirePullRequestReviews));
            assert_eq!(
                state.get(RuleId::RequiredApprovingReviewCount),
                RuleValue::Count(1)
            );
            assert!(state.enabled(RuleId::EnforceAdmins));
        }
        other => panic!("expected apply, got {other:?}"),
    }
}

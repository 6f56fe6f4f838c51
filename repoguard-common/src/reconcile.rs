//! Reconciliation entry points.
//!
//! One run is a straight line: fetch → normalize → diff → (stop if clean) →
//! resolve target via the chosen strategy → apply → report. The strategy is
//! an explicit parameter — there is no default, and interactive selection
//! belongs to the caller.

use crate::apply::apply;
use crate::catalog::desired_baseline;
use crate::diff::{DiffReport, diff};
use crate::errors::{ApplyWarning, ReconcileError};
use crate::normalize::observe;
use crate::remote::ProtectionApi;
use crate::state::PolicyState;
use crate::strategy::Strategy;
use crate::types::RepoId;
use tracing::info;

/// What a reconciliation run did.
#[derive(Debug)]
pub enum Outcome {
    /// Current state already matched the baseline; nothing was applied.
    NoChangeNeeded,
    /// A target state was computed and applied.
    Applied {
        strategy: Strategy,
        /// The state that now holds on the remote.
        state: PolicyState,
        /// Non-fatal problems from the apply.
        warnings: Vec<ApplyWarning>,
    },
}

/// Full report of a reconciliation run.
#[derive(Debug)]
pub struct Report {
    pub repo: RepoId,
    pub branch: String,
    /// The ordered per-rule comparison that drove the run.
    pub diff: DiffReport,
    pub outcome: Outcome,
}

/// Compare a branch's current protection against the baseline without
/// mutating anything.
///
/// # Errors
///
/// Returns [`ReconcileError::RemoteStateUnavailable`] when the current state
/// cannot be fetched.
pub fn diff_only(
    api: &dyn ProtectionApi,
    repo: &RepoId,
    branch: &str,
) -> Result<DiffReport, ReconcileError> {
    let current = observe(api, repo, branch)?;
    Ok(diff(&current, &desired_baseline()))
}

/// Reconcile a branch's protection with the baseline using the given
/// strategy.
///
/// If the normalized current state already equals the baseline, no update is
/// issued and the report says so.
///
/// # Errors
///
/// Returns [`ReconcileError`] when the fetch or the primary update fails.
pub fn reconcile(
    api: &dyn ProtectionApi,
    repo: &RepoId,
    branch: &str,
    strategy: Strategy,
) -> Result<Report, ReconcileError> {
    let desired = desired_baseline();
    let current = observe(api, repo, branch)?;
    let report = diff(&current, &desired);

    if !report.any_changed {
        info!(%repo, branch, "protection already matches baseline");
        return Ok(Report {
            repo: repo.clone(),
            branch: branch.to_string(),
            diff: report,
            outcome: Outcome::NoChangeNeeded,
        });
    }

    let target = strategy.resolve(&current, &desired);
    info!(%repo, branch, %strategy, changed = report.changed().count(), "applying protection update");
    let applied = apply(api, repo, branch, &target)?;

    Ok(Report {
        repo: repo.clone(),
        branch: branch.to_string(),
        diff: report,
        outcome: Outcome::Applied {
            strategy,
            state: applied.state,
            warnings: applied.warnings,
        },
    })
}

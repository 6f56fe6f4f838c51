//! Mock remote collaborator for tests.
//!
//! Implements the same traits as the real client without network access.
//! Applied updates are stored and re-rendered as fetch documents, so
//! apply-then-refetch round trips behave like the real remote and
//! idempotence is testable offline.

use crate::errors::ApiError;
use crate::remote::{
    EnabledFlag, LicenseApi, LicenseInfo, ProtectionApi, ProtectionDocument, ProtectionUpdate,
    PullRequestReviewsBlock, StatusChecksBlock,
};
use crate::types::RepoId;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MockState {
    document: Option<ProtectionDocument>,
    signatures_required: bool,
    licenses: Vec<(RepoId, Option<LicenseInfo>)>,
    last_update: Option<ProtectionUpdate>,
    fetch_calls: usize,
    apply_calls: usize,
    signature_calls: usize,
}

/// A configurable in-memory stand-in for the remote API.
#[derive(Debug, Default)]
pub struct MockProtectionApi {
    state: Mutex<MockState>,
    fail_fetch: Option<ApiError>,
    fail_signature_fetch: Option<ApiError>,
    fail_apply: Option<ApiError>,
    fail_signature_update: Option<ApiError>,
    fail_license: Option<ApiError>,
}

impl MockProtectionApi {
    /// A branch with no protection configured at all.
    pub fn unprotected() -> Self {
        Self::default()
    }

    /// A branch with the given protection document already in place.
    pub fn with_document(document: ProtectionDocument) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().document = Some(document);
        api
    }

    /// Set the signed-commits requirement the mock starts with.
    pub fn with_signatures(self, required: bool) -> Self {
        self.state.lock().unwrap().signatures_required = required;
        self
    }

    /// Register a license lookup result for a repository.
    pub fn with_license(self, repo: RepoId, license: Option<LicenseInfo>) -> Self {
        self.state.lock().unwrap().licenses.push((repo, license));
        self
    }

    /// Make the protection fetch fail.
    pub fn failing_fetch(mut self, error: ApiError) -> Self {
        self.fail_fetch = Some(error);
        self
    }

    /// Make the signature-requirement fetch fail.
    pub fn failing_signature_fetch(mut self, error: ApiError) -> Self {
        self.fail_signature_fetch = Some(error);
        self
    }

    /// Make the primary update fail.
    pub fn failing_apply(mut self, error: ApiError) -> Self {
        self.fail_apply = Some(error);
        self
    }

    /// Make the signature sub-resource update fail.
    pub fn failing_signature_update(mut self, error: ApiError) -> Self {
        self.fail_signature_update = Some(error);
        self
    }

    /// Make the license lookup fail.
    pub fn failing_license(mut self, error: ApiError) -> Self {
        self.fail_license = Some(error);
        self
    }

    /// Number of protection fetches performed.
    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    /// Number of primary updates attempted.
    pub fn apply_calls(&self) -> usize {
        self.state.lock().unwrap().apply_calls
    }

    /// Number of signature sub-resource updates attempted.
    pub fn signature_calls(&self) -> usize {
        self.state.lock().unwrap().signature_calls
    }

    /// The most recent primary update payload, if any.
    pub fn last_update(&self) -> Option<ProtectionUpdate> {
        self.state.lock().unwrap().last_update.clone()
    }

    /// The current signed-commits requirement held by the mock.
    pub fn signatures_required(&self) -> bool {
        self.state.lock().unwrap().signatures_required
    }

    // Render an accepted update the way the remote would echo it back.
    fn render(update: &ProtectionUpdate) -> ProtectionDocument {
        ProtectionDocument {
            required_pull_request_reviews: update.required_pull_request_reviews.as_ref().map(
                |reviews| PullRequestReviewsBlock {
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    require_last_push_approval: reviews.require_last_push_approval,
                    required_approving_review_count: reviews.required_approving_review_count,
                },
            ),
            required_status_checks: update.required_status_checks.as_ref().map(|checks| {
                StatusChecksBlock {
                    strict: checks.strict,
                    contexts: checks.contexts.clone(),
                }
            }),
            enforce_admins: Some(EnabledFlag::new(update.enforce_admins)),
            required_linear_history: Some(EnabledFlag::new(update.required_linear_history)),
            required_conversation_resolution: Some(EnabledFlag::new(
                update.required_conversation_resolution,
            )),
            block_creations: Some(EnabledFlag::new(update.block_creations)),
            lock_branch: Some(EnabledFlag::new(update.lock_branch)),
            allow_force_pushes: Some(EnabledFlag::new(update.allow_force_pushes)),
            allow_deletions: Some(EnabledFlag::new(update.allow_deletions)),
            allow_fork_syncing: Some(EnabledFlag::new(update.allow_fork_syncing)),
        }
    }
}

impl ProtectionApi for MockProtectionApi {
    fn fetch_protection(
        &self,
        _repo: &RepoId,
        _branch: &str,
    ) -> Result<Option<ProtectionDocument>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        if let Some(error) = &self.fail_fetch {
            return Err(error.clone());
        }
        Ok(state.document.clone())
    }

    fn fetch_signature_requirement(&self, _repo: &RepoId, _branch: &str) -> Result<bool, ApiError> {
        if let Some(error) = &self.fail_signature_fetch {
            return Err(error.clone());
        }
        Ok(self.state.lock().unwrap().signatures_required)
    }

    fn apply_protection(
        &self,
        _repo: &RepoId,
        _branch: &str,
        update: &ProtectionUpdate,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.apply_calls += 1;
        if let Some(error) = &self.fail_apply {
            return Err(error.clone());
        }
        state.document = Some(Self::render(update));
        state.last_update = Some(update.clone());
        Ok(())
    }

    fn set_signature_requirement(
        &self,
        _repo: &RepoId,
        _branch: &str,
        enabled: bool,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.signature_calls += 1;
        if let Some(error) = &self.fail_signature_update {
            return Err(error.clone());
        }
        state.signatures_required = enabled;
        Ok(())
    }
}

impl LicenseApi for MockProtectionApi {
    fn fetch_license(&self, repo: &RepoId) -> Result<Option<LicenseInfo>, ApiError> {
        if let Some(error) = &self.fail_license {
            return Err(error.clone());
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .licenses
            .iter()
            .find(|(id, _)| id == repo)
            .and_then(|(_, license)| license.clone()))
    }
}

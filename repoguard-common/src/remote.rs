//! Remote API surface: document models and collaborator traits.
//!
//! The GET document is sparse — the remote omits sub-objects and leaf fields
//! rather than sending explicit falsy values — so every sub-block is an
//! `Option` and every leaf carries a serde default. Absence is resolved to
//! concrete values by the normalizer, never here.

use crate::errors::ApiError;
use crate::types::RepoId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fetch-side models (sparse)
// ---------------------------------------------------------------------------

/// A boolean setting wrapped in an object, as the protection document
/// represents its top-level flags (`{"enabled": true}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledFlag {
    #[serde(default)]
    pub enabled: bool,
}

impl EnabledFlag {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// The pull-request-review sub-block of a protection document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviewsBlock {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub require_last_push_approval: bool,
    #[serde(default)]
    pub required_approving_review_count: u32,
}

/// The status-check sub-block of a protection document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChecksBlock {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub contexts: Vec<String>,
}

/// The branch protection document as returned by the remote API.
///
/// A sub-block being `None` means the corresponding rules are not configured;
/// the whole document being absent (the fetch returning `None`) means the
/// branch has no protection at all. Both are legitimate states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionDocument {
    #[serde(default)]
    pub required_pull_request_reviews: Option<PullRequestReviewsBlock>,
    #[serde(default)]
    pub required_status_checks: Option<StatusChecksBlock>,
    #[serde(default)]
    pub enforce_admins: Option<EnabledFlag>,
    #[serde(default)]
    pub required_linear_history: Option<EnabledFlag>,
    #[serde(default)]
    pub required_conversation_resolution: Option<EnabledFlag>,
    #[serde(default)]
    pub block_creations: Option<EnabledFlag>,
    #[serde(default)]
    pub lock_branch: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_force_pushes: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_deletions: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_fork_syncing: Option<EnabledFlag>,
}

// ---------------------------------------------------------------------------
// Apply-side payload
// ---------------------------------------------------------------------------

/// The pull-request-review sub-object of an update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviewsPayload {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub require_last_push_approval: bool,
    pub required_approving_review_count: u32,
}

/// The status-check sub-object of an update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChecksPayload {
    pub strict: bool,
    pub contexts: Vec<String>,
}

/// The primary update payload.
///
/// The remote API distinguishes `null` from `{}` for the sub-objects: a
/// disabled status-check or review requirement must be serialized as `null`,
/// not as an empty object. `restrictions` must be present and is always
/// `null` here (push restrictions are not part of the rule set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionUpdate {
    pub required_status_checks: Option<StatusChecksPayload>,
    pub enforce_admins: bool,
    pub required_pull_request_reviews: Option<PullRequestReviewsPayload>,
    pub restrictions: Option<()>,
    pub required_linear_history: bool,
    pub allow_force_pushes: bool,
    pub allow_deletions: bool,
    pub block_creations: bool,
    pub required_conversation_resolution: bool,
    pub lock_branch: bool,
    pub allow_fork_syncing: bool,
}

// ---------------------------------------------------------------------------
// License models
// ---------------------------------------------------------------------------

/// License metadata detected for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Short machine key, e.g. `mit`.
    pub key: String,
    /// Human-readable name, e.g. `MIT License`.
    pub name: String,
    /// SPDX identifier when the remote could classify the license.
    #[serde(default)]
    pub spdx_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// The four operations the reconciliation engine requires from a remote
/// collaborator.
///
/// The signed-commits requirement lives outside the main protection document
/// on the remote, so it has its own fetch and update operations; callers of
/// the engine never see that distinction.
pub trait ProtectionApi {
    /// Fetch the current protection document.
    ///
    /// `Ok(None)` is the legitimate "no protection configured" state, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport, auth, or decode failures.
    fn fetch_protection(
        &self,
        repo: &RepoId,
        branch: &str,
    ) -> Result<Option<ProtectionDocument>, ApiError>;

    /// Fetch whether signed commits are required.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport, auth, or decode failures.
    fn fetch_signature_requirement(&self, repo: &RepoId, branch: &str) -> Result<bool, ApiError>;

    /// Issue the primary protection update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the remote rejects the update.
    fn apply_protection(
        &self,
        repo: &RepoId,
        branch: &str,
        update: &ProtectionUpdate,
    ) -> Result<(), ApiError>;

    /// Enable or disable the signed-commits requirement.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the sub-resource call fails.
    fn set_signature_requirement(
        &self,
        repo: &RepoId,
        branch: &str,
        enabled: bool,
    ) -> Result<(), ApiError>;
}

/// License lookup for the fleet audit.
pub trait LicenseApi {
    /// Fetch the detected license for a repository.
    ///
    /// `Ok(None)` means no license file was detected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport, auth, or decode failures.
    fn fetch_license(&self, repo: &RepoId) -> Result<Option<LicenseInfo>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_document_deserializes_with_defaults() {
        // Only some blocks present; leaf fields partially omitted.
        let doc: ProtectionDocument = serde_json::from_str(
            r#"{
                "required_pull_request_reviews": {
                    "required_approving_review_count": 2
                },
                "enforce_admins": {"enabled": true}
            }"#,
        )
        .unwrap();

        let reviews = doc.required_pull_request_reviews.unwrap();
        assert_eq!(reviews.required_approving_review_count, 2);
        assert!(!reviews.dismiss_stale_reviews);
        assert!(!reviews.require_code_owner_reviews);
        assert!(doc.enforce_admins.unwrap().enabled);
        assert!(doc.required_status_checks.is_none());
        assert!(doc.allow_force_pushes.is_none());
    }

    #[test]
    fn test_empty_document_deserializes() {
        let doc: ProtectionDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ProtectionDocument::default());
    }

    #[test]
    fn test_update_serializes_null_sub_objects() {
        let update = ProtectionUpdate {
            required_status_checks: None,
            enforce_admins: true,
            required_pull_request_reviews: None,
            restrictions: None,
            required_linear_history: false,
            allow_force_pushes: false,
            allow_deletions: false,
            block_creations: false,
            required_conversation_resolution: true,
            lock_branch: false,
            allow_fork_syncing: false,
        };
        let value = serde_json::to_value(&update).unwrap();
        // null, not {} and not omitted: the remote treats those differently.
        assert!(value.get("required_status_checks").unwrap().is_null());
        assert!(value.get("required_pull_request_reviews").unwrap().is_null());
        assert!(value.get("restrictions").unwrap().is_null());
        assert_eq!(value.get("enforce_admins").unwrap(), true);
    }

    #[test]
    fn test_license_info_decodes_without_spdx() {
        let info: LicenseInfo =
            serde_json::from_str(r#"{"key": "other", "name": "Other"}"#).unwrap();
        assert_eq!(info.key, "other");
        assert_eq!(info.spdx_id, None);
    }
}

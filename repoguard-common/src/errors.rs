//! Error taxonomy for the reconciliation engine.
//!
//! Two failures are fatal to a run: the initial fetch
//! ([`ReconcileError::RemoteStateUnavailable`]) and the primary update
//! ([`ReconcileError::ApplyRejected`]). The signature sub-resource failing
//! *after* a successful primary update is not fatal; it surfaces as an
//! [`ApplyWarning`] on the report instead. No retries happen here —
//! transient-vs-permanent classification belongs to the transport layer.

use crate::types::RepoId;
use thiserror::Error;

/// Errors reported by a remote API collaborator.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport failure for {endpoint}: {message}")]
    Transport {
        /// The endpoint that was being called.
        endpoint: String,
        /// Underlying transport error text.
        message: String,
    },

    /// The remote answered with a non-success status.
    #[error("remote returned HTTP {status} for {endpoint}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The endpoint that was being called.
        endpoint: String,
        /// Response body or status text.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("could not decode response from {endpoint}: {message}")]
    Decode {
        /// The endpoint that was being called.
        endpoint: String,
        /// Decoder error text.
        message: String,
    },
}

impl ApiError {
    /// HTTP status of the failure, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Which remote call a fetch failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    /// The main branch protection document.
    Protection,
    /// The required-signatures sub-resource.
    SignatureRequirement,
    /// The repository license lookup.
    License,
}

impl std::fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteCall::Protection => f.write_str("protection"),
            RemoteCall::SignatureRequirement => f.write_str("signature requirement"),
            RemoteCall::License => f.write_str("license"),
        }
    }
}

/// Fatal errors from a reconciliation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    /// The current state could not be fetched for reasons other than
    /// "no protection configured" (which is a valid empty state).
    #[error("remote state unavailable for {repo} ({call} fetch): {source}")]
    RemoteStateUnavailable {
        /// Repository whose state was being fetched.
        repo: RepoId,
        /// Which fetch failed.
        call: RemoteCall,
        /// The underlying API error.
        source: ApiError,
    },

    /// The primary protection update was rejected; no partial state is
    /// assumed applied.
    #[error("protection update rejected for {repo}: {source}")]
    ApplyRejected {
        /// Repository the update targeted.
        repo: RepoId,
        /// The underlying API error.
        source: ApiError,
    },
}

/// Non-fatal problems from an apply that still succeeded overall.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApplyWarning {
    /// The primary update succeeded but the signed-commits sub-resource call
    /// failed; the main protections took effect.
    #[error("signature requirement could not be set to {desired} for {repo}: {source}")]
    SignatureUpdateFailed {
        /// Repository the update targeted.
        repo: RepoId,
        /// The value the sub-resource was being driven to.
        desired: bool,
        /// The underlying API error.
        source: ApiError,
    },
}

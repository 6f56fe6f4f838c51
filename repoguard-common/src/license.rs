//! License state across a repository fleet.
//!
//! The fleet is whatever list of repositories the caller hands in (the CLI
//! reads it from configuration). One failing repository does not abort the
//! sweep; its failure is folded into the report entry.

use crate::errors::ApiError;
use crate::remote::{LicenseApi, LicenseInfo};
use crate::types::RepoId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// License state of a single repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LicenseState {
    /// A license file was detected and classified.
    Licensed { license: LicenseInfo },
    /// No license file was detected.
    Missing,
    /// The lookup failed; the repository may still have a license.
    Unreachable { error: String },
}

/// One row of a fleet audit report.
#[derive(Debug, Clone, Serialize)]
pub struct FleetLicenseEntry {
    pub repo: RepoId,
    #[serde(flatten)]
    pub state: LicenseState,
}

/// License audit across a fleet of repositories.
#[derive(Debug, Clone, Serialize)]
pub struct FleetLicenseReport {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<FleetLicenseEntry>,
}

impl FleetLicenseReport {
    /// Number of repositories with a detected license.
    pub fn licensed(&self) -> usize {
        self.count(|state| matches!(state, LicenseState::Licensed { .. }))
    }

    /// Number of repositories without a detected license.
    pub fn missing(&self) -> usize {
        self.count(|state| matches!(state, LicenseState::Missing))
    }

    /// Number of repositories the lookup failed for.
    pub fn unreachable(&self) -> usize {
        self.count(|state| matches!(state, LicenseState::Unreachable { .. }))
    }

    fn count(&self, pred: impl Fn(&LicenseState) -> bool) -> usize {
        self.entries.iter().filter(|entry| pred(&entry.state)).count()
    }
}

/// Audit license state for each repository in the fleet, in the given order.
pub fn audit_fleet(api: &dyn LicenseApi, repos: &[RepoId]) -> FleetLicenseReport {
    let entries = repos
        .iter()
        .map(|repo| {
            let state = match api.fetch_license(repo) {
                Ok(Some(license)) => LicenseState::Licensed { license },
                Ok(None) => LicenseState::Missing,
                Err(error) => {
                    warn!(%repo, %error, "license lookup failed");
                    LicenseState::Unreachable {
                        error: error.to_string(),
                    }
                }
            };
            FleetLicenseEntry {
                repo: repo.clone(),
                state,
            }
        })
        .collect();

    FleetLicenseReport {
        generated_at: Utc::now(),
        entries,
    }
}

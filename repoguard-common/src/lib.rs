//! Core engine for repoguard.
//!
//! Reconciles a repository branch's protection policy against a fixed
//! desired baseline, and audits license state across a repository fleet.
//! The engine is synchronous and holds no state across runs: each run is one
//! fetch, one normalization, one diff, one strategy computation, and one
//! apply. Remote access goes through the [`remote::ProtectionApi`] and
//! [`remote::LicenseApi`] traits; [`github::GithubApi`] is the production
//! implementation and [`mock::MockProtectionApi`] the offline one.

pub mod apply;
pub mod catalog;
pub mod config;
pub mod diff;
pub mod errors;
pub mod github;
pub mod license;
pub mod mock;
pub mod normalize;
pub mod reconcile;
pub mod remote;
pub mod state;
pub mod strategy;
pub mod types;

pub use apply::{AppliedPolicy, apply, build_update};
pub use catalog::{CATALOG, RuleId, RuleSpec, SecurityDirection, ValueKind, desired_baseline};
pub use config::{ConfigError, RepoguardConfig, load_config};
pub use diff::{DiffEntry, DiffReport, diff};
pub use errors::{ApiError, ApplyWarning, ReconcileError, RemoteCall};
pub use github::GithubApi;
pub use license::{FleetLicenseEntry, FleetLicenseReport, LicenseState, audit_fleet};
pub use mock::MockProtectionApi;
pub use normalize::{normalize, observe};
pub use reconcile::{Outcome, Report, diff_only, reconcile};
pub use remote::{LicenseApi, LicenseInfo, ProtectionApi, ProtectionDocument, ProtectionUpdate};
pub use state::{PolicyState, RuleValue};
pub use strategy::{Strategy, merge, overwrite};
pub use types::RepoId;

//! Fleet license audit command.

use super::helpers::pad_label;
use anyhow::{Result, bail};
use console::style;
use repoguard_common::{GithubApi, LicenseState, RepoguardConfig, audit_fleet};

/// Report license state for every configured fleet repository.
pub fn run_audit(api: &GithubApi, config: &RepoguardConfig, json: bool) -> Result<()> {
    if config.fleet.repos.is_empty() {
        bail!("no fleet repositories configured; add [fleet] repos to the config file");
    }

    let report = audit_fleet(api, &config.fleet.repos);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style("Fleet license audit").bold());
    for entry in &report.entries {
        let (marker, detail) = match &entry.state {
            LicenseState::Licensed { license } => (
                style("✓").green().to_string(),
                match &license.spdx_id {
                    Some(spdx) => format!("{} ({spdx})", license.name),
                    None => license.name.clone(),
                },
            ),
            LicenseState::Missing => (
                style("✗").red().to_string(),
                style("no license detected").red().to_string(),
            ),
            LicenseState::Unreachable { error } => (
                style("?").yellow().to_string(),
                style(format!("unreachable: {error}")).yellow().to_string(),
            ),
        };
        println!("{marker} {} {detail}", pad_label(&entry.repo.to_string()));
    }
    println!(
        "  {}",
        style(format!(
            "{} licensed, {} missing, {} unreachable",
            report.licensed(),
            report.missing(),
            report.unreachable()
        ))
        .dim()
    );
    Ok(())
}

//! Protection diff and reconcile commands.

use super::helpers::{pad_label, summarize_diff};
use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::Select;
use repoguard_common::{
    DiffReport, GithubApi, PolicyState, RepoId, Strategy, apply, desired_baseline, diff, observe,
};
use serde_json::json;

/// Preview the per-rule diff without mutating anything.
pub fn run_diff(api: &GithubApi, repo: &RepoId, branch: &str, json: bool) -> Result<()> {
    let current = observe(api, repo, branch)?;
    let report = diff(&current, &desired_baseline());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "repo": repo,
                "branch": branch,
                "diff": report,
            }))?
        );
        return Ok(());
    }

    print_diff_table(repo, branch, &report);
    Ok(())
}

/// Reconcile a branch with the baseline, prompting for a strategy when none
/// was given on the command line.
pub fn run_protect(
    api: &GithubApi,
    repo: &RepoId,
    branch: &str,
    strategy: Option<Strategy>,
    json: bool,
) -> Result<()> {
    let desired = desired_baseline();
    let current = observe(api, repo, branch)?;
    let report = diff(&current, &desired);

    if !json {
        print_diff_table(repo, branch, &report);
    }

    if !report.any_changed {
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "repo": repo,
                    "branch": branch,
                    "diff": report,
                    "outcome": "no_change_needed",
                }))?
            );
        } else {
            println!(
                "{} Protection already matches the baseline; nothing to do.",
                style("✓").green()
            );
        }
        return Ok(());
    }

    let strategy = match strategy {
        Some(strategy) => strategy,
        None => prompt_strategy(json)?,
    };

    let target = strategy.resolve(&current, &desired);
    let applied = apply(api, repo, branch, &target)
        .with_context(|| format!("applying protection to {repo}@{branch}"))?;

    if json {
        let warnings: Vec<String> = applied.warnings.iter().map(|w| w.to_string()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "repo": repo,
                "branch": branch,
                "diff": report,
                "outcome": "applied",
                "strategy": strategy.to_string(),
                "applied": applied.state,
                "warnings": warnings,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "{} Applied {} protection to {}@{}:",
        style("✓").green(),
        style(strategy).bold(),
        style(repo).bold(),
        branch
    );
    print_applied_table(&applied.state, &current);
    for warning in &applied.warnings {
        println!("{} {}", style("warning:").yellow().bold(), warning);
    }
    Ok(())
}

fn prompt_strategy(json: bool) -> Result<Strategy> {
    if json {
        bail!("--json requires an explicit --strategy (no interactive prompt)");
    }
    let choice = Select::new()
        .with_prompt("Resolve differences how?")
        .item("merge      - combine with current settings, never weakening security")
        .item("overwrite  - replace current settings with the baseline")
        .default(0)
        .interact_opt()
        .context("reading strategy selection")?;
    match choice {
        Some(0) => Ok(Strategy::Merge),
        Some(_) => Ok(Strategy::Overwrite),
        None => bail!("aborted: no strategy selected"),
    }
}

fn print_diff_table(repo: &RepoId, branch: &str, report: &DiffReport) {
    println!(
        "{} {}@{}",
        style("Branch protection for").bold(),
        style(repo).cyan(),
        branch
    );
    println!(
        "  {} {:>8}  {:>8}",
        pad_label("rule"),
        style("current").dim(),
        style("desired").dim()
    );
    for entry in &report.entries {
        let marker = if entry.changed {
            style("~").yellow().to_string()
        } else {
            style("·").dim().to_string()
        };
        let current = if entry.changed {
            style(entry.current.to_string()).yellow().to_string()
        } else {
            entry.current.to_string()
        };
        println!(
            "{marker} {} {current:>8}  {:>8}",
            pad_label(entry.label),
            entry.desired.to_string()
        );
    }
    println!("  {}", style(summarize_diff(report)).dim());
}

fn print_applied_table(applied: &PolicyState, previous: &PolicyState) {
    for (rule, value) in applied.iter() {
        let was = previous.get(rule);
        if was == value {
            continue;
        }
        println!(
            "  {} {} {} {}",
            pad_label(rule.spec().label),
            style(was).dim(),
            style("→").dim(),
            style(value).green()
        );
    }
    if !applied.contexts().is_empty() {
        let contexts: Vec<&str> = applied.contexts().iter().map(String::as_str).collect();
        println!(
            "  {} {}",
            pad_label("required status contexts"),
            contexts.join(", ")
        );
    }
}

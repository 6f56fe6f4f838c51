//! repoguard - branch protection reconciliation and fleet license auditing.
//!
//! Thin CLI over the `repoguard-common` engine: argument parsing, strategy
//! prompting, and table rendering live here; everything with invariants
//! lives in the library.

#![forbid(unsafe_code)]

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use repoguard_common::{GithubApi, RepoId, Strategy, load_config};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "repoguard")]
#[command(author, version, about = "Branch protection and license guardrails for GitHub repositories")]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a branch's protection differs from the baseline, without
    /// changing anything
    Diff {
        /// Repository in owner/name form
        repo: String,
        /// Branch to inspect (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Reconcile a branch's protection with the baseline policy
    Protect {
        /// Repository in owner/name form
        repo: String,
        /// Branch to protect (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
        /// Conflict-resolution strategy; prompted for interactively when
        /// omitted
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// License state across the configured fleet
    License {
        #[command(subcommand)]
        command: LicenseCommands,
    },
}

#[derive(Subcommand)]
enum LicenseCommands {
    /// Report license state for every fleet repository
    Audit,
}

/// CLI surface of [`Strategy`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Replace the current configuration with the baseline
    Overwrite,
    /// Combine per rule, never weakening security
    Merge,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Overwrite => Strategy::Overwrite,
            StrategyArg::Merge => Strategy::Merge,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let token = config.resolve_token();
    if token.is_none() {
        warn!(
            "no token found in ${}; protection endpoints require authentication",
            config.github.token_env
        );
    }
    let api = GithubApi::with_base_url(&config.github.api_url, token)
        .context("building GitHub client")?;

    match cli.command {
        Commands::Diff { repo, branch } => {
            let repo: RepoId = repo.parse()?;
            let branch = branch.unwrap_or_else(|| config.github.default_branch.clone());
            commands::protect::run_diff(&api, &repo, &branch, cli.json)
        }
        Commands::Protect {
            repo,
            branch,
            strategy,
        } => {
            let repo: RepoId = repo.parse()?;
            let branch = branch.unwrap_or_else(|| config.github.default_branch.clone());
            commands::protect::run_protect(
                &api,
                &repo,
                &branch,
                strategy.map(Strategy::from),
                cli.json,
            )
        }
        Commands::License { command } => match command {
            LicenseCommands::Audit => commands::license::run_audit(&api, &config, cli.json),
        },
    }
}

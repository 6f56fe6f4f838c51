//! Configuration for repoguard.
//!
//! Loaded from `repoguard/config.toml` under the user configuration
//! directory (override with an explicit path). A missing file is not an
//! error: every field has a default, and the token always comes from the
//! environment rather than the file.

use crate::types::RepoId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoguardConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL (GitHub Enterprise installs override this).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Branch to protect when a command does not name one.
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            default_branch: default_branch(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Repositories covered by fleet-wide commands, in `owner/name` form.
    #[serde(default)]
    pub repos: Vec<RepoId>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepoguardConfig {
    /// Resolve the access token from the configured environment variable.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("could not read config file {path}: {message}")]
    Read { path: PathBuf, message: String },
    /// The file is not valid TOML for this schema.
    #[error("could not parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// The default config file location, when a user config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repoguard").join("config.toml"))
}

/// Load configuration from `path`, or from the default location when `path`
/// is `None`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] when a file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<RepoguardConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(RepoguardConfig::default()),
        },
    };

    if !path.exists() {
        return Ok(RepoguardConfig::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|error| ConfigError::Read {
        path: path.clone(),
        message: error.to_string(),
    })?;
    toml::from_str(&text).map_err(|error| ConfigError::Parse {
        path,
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.github.default_branch, "main");
        assert!(config.fleet.repos.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[fleet]\nrepos = [\"octocat/hello-world\", \"octocat/spoon-knife\"]"
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.fleet.repos.len(), 2);
        assert_eq!(config.fleet.repos[0].to_string(), "octocat/hello-world");
        assert_eq!(config.github.default_branch, "main");
    }

    #[test]
    fn test_invalid_repo_spec_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fleet]\nrepos = [\"not-a-repo\"]").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_enterprise_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[github]\napi_url = \"https://ghe.example.com/api/v3\"\ndefault_branch = \"trunk\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.default_branch, "trunk");
    }
}

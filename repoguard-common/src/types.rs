//! Common identifier types used across repoguard components.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for a repository, in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Build a repository id from its owner and name parts.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRepoId`] if either part is empty or contains `/`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidRepoId> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() || owner.contains('/') || name.contains('/') {
            return Err(InvalidRepoId {
                value: format!("{owner}/{name}"),
            });
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoId {
    type Err = InvalidRepoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Self::new(owner, name)
            }
            _ => Err(InvalidRepoId {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for RepoId {
    type Error = InvalidRepoId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoId> for String {
    fn from(id: RepoId) -> Self {
        id.to_string()
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A repository specifier that is not in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid repository id '{value}': expected owner/name")]
pub struct InvalidRepoId {
    /// The offending input.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_name() {
        let id: RepoId = "octocat/hello-world".parse().unwrap();
        assert_eq!(id.owner(), "octocat");
        assert_eq!(id.name(), "hello-world");
        assert_eq!(id.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_rejects_malformed_specs() {
        assert!("".parse::<RepoId>().is_err());
        assert!("justaname".parse::<RepoId>().is_err());
        assert!("/repo".parse::<RepoId>().is_err());
        assert!("owner/".parse::<RepoId>().is_err());
    }

    #[test]
    fn test_extra_slash_stays_in_name() {
        // GitHub repo names cannot contain '/', so reject rather than guess.
        assert!("a/b/c".parse::<RepoId>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let id: RepoId = "octocat/hello-world".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"octocat/hello-world\"");
        let back: RepoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

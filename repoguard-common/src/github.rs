//! GitHub REST implementation of the remote collaborator traits.
//!
//! A thin blocking client: one request per trait operation, no retries.
//! HTTP 404 is mapped to the legitimate "not configured" / "no license"
//! states; every other non-success status surfaces as [`ApiError::Status`]
//! for the caller to classify.

use crate::errors::ApiError;
use crate::remote::{
    EnabledFlag, LicenseApi, LicenseInfo, ProtectionApi, ProtectionDocument, ProtectionUpdate,
};
use crate::types::RepoId;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repoguard/", env!("CARGO_PKG_VERSION"));

/// Blocking GitHub API client.
pub struct GithubApi {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubApi {
    /// Create a client against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(token: Option<String>) -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, token)
    }

    /// Create a client against an explicit API base URL (GitHub Enterprise,
    /// or a test server).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|error| ApiError::Transport {
                endpoint: base_url.clone(),
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn protection_endpoint(&self, repo: &RepoId, branch: &str) -> String {
        format!(
            "{}/repos/{}/{}/branches/{}/protection",
            self.base_url,
            repo.owner(),
            repo.name(),
            branch
        )
    }

    fn signatures_endpoint(&self, repo: &RepoId, branch: &str) -> String {
        format!("{}/required_signatures", self.protection_endpoint(repo, branch))
    }

    fn license_endpoint(&self, repo: &RepoId) -> String {
        format!(
            "{}/repos/{}/{}/license",
            self.base_url,
            repo.owner(),
            repo.name()
        )
    }

    fn request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
    ) -> reqwest::blocking::RequestBuilder {
        let mut builder = self
            .client
            .request(method, endpoint)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn send(
        &self,
        builder: reqwest::blocking::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        builder.send().map_err(|error| ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        })
    }

    fn status_error(response: reqwest::blocking::Response, endpoint: &str) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "unable to read response body".to_string());
        ApiError::Status {
            status,
            endpoint: endpoint.to_string(),
            message,
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        response.json().map_err(|error| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        })
    }
}

impl ProtectionApi for GithubApi {
    fn fetch_protection(
        &self,
        repo: &RepoId,
        branch: &str,
    ) -> Result<Option<ProtectionDocument>, ApiError> {
        let endpoint = self.protection_endpoint(repo, branch);
        let response = self.send(self.request(reqwest::Method::GET, &endpoint), &endpoint)?;
        match response.status().as_u16() {
            // 404 here means "branch not protected", a valid empty state.
            404 => Ok(None),
            status if (200..300).contains(&status) => {
                Ok(Some(Self::decode(response, &endpoint)?))
            }
            _ => Err(Self::status_error(response, &endpoint)),
        }
    }

    fn fetch_signature_requirement(&self, repo: &RepoId, branch: &str) -> Result<bool, ApiError> {
        let endpoint = self.signatures_endpoint(repo, branch);
        let response = self.send(self.request(reqwest::Method::GET, &endpoint), &endpoint)?;
        match response.status().as_u16() {
            404 => Ok(false),
            status if (200..300).contains(&status) => {
                let flag: EnabledFlag = Self::decode(response, &endpoint)?;
                Ok(flag.enabled)
            }
            _ => Err(Self::status_error(response, &endpoint)),
        }
    }

    fn apply_protection(
        &self,
        repo: &RepoId,
        branch: &str,
        update: &ProtectionUpdate,
    ) -> Result<(), ApiError> {
        let endpoint = self.protection_endpoint(repo, branch);
        let response = self.send(
            self.request(reqwest::Method::PUT, &endpoint).json(update),
            &endpoint,
        )?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response, &endpoint))
        }
    }

    fn set_signature_requirement(
        &self,
        repo: &RepoId,
        branch: &str,
        enabled: bool,
    ) -> Result<(), ApiError> {
        let endpoint = self.signatures_endpoint(repo, branch);
        let method = if enabled {
            reqwest::Method::POST
        } else {
            reqwest::Method::DELETE
        };
        let response = self.send(self.request(method, &endpoint), &endpoint)?;
        match response.status().as_u16() {
            // Deleting an already-absent requirement is a no-op, not a failure.
            404 if !enabled => Ok(()),
            status if (200..300).contains(&status) => Ok(()),
            _ => Err(Self::status_error(response, &endpoint)),
        }
    }
}

impl LicenseApi for GithubApi {
    fn fetch_license(&self, repo: &RepoId) -> Result<Option<LicenseInfo>, ApiError> {
        #[derive(Deserialize)]
        struct LicenseDocument {
            #[serde(default)]
            license: Option<LicenseInfo>,
        }

        let endpoint = self.license_endpoint(repo);
        let response = self.send(self.request(reqwest::Method::GET, &endpoint), &endpoint)?;
        match response.status().as_u16() {
            404 => Ok(None),
            status if (200..300).contains(&status) => {
                let doc: LicenseDocument = Self::decode(response, &endpoint)?;
                Ok(doc.license)
            }
            _ => Err(Self::status_error(response, &endpoint)),
        }
    }
}

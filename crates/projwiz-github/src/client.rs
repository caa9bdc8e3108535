//! Hosted-repository REST client

use crate::error::{Error, Result};
use crate::types::{Branch, CreateRepositoryRequest, CreatedRepository, Identity, Repository};
use projwiz_core::config::credential_is_configured;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("projwiz/", env!("CARGO_PKG_VERSION"));

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 100;

/// Client for the hosted-repository API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a client for the API rooted at `api_url`
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str, credential: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .header(ACCEPT, ACCEPT_HEADER)
            .header(AUTHORIZATION, format!("Bearer {}", credential.trim()))
    }

    async fn get_json<T: DeserializeOwned>(&self, credential: &str, path: &str) -> Result<T> {
        if !credential_is_configured(credential) {
            return Err(Error::NotConfigured);
        }

        debug!("GET {}{}", self.api_url, path);
        let response = self.request(Method::GET, path, credential).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::status(path, status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    /// Login name of the credential's owner
    pub async fn try_get_identity(&self, credential: &str) -> Result<String> {
        let identity: Identity = self.get_json(credential, "/user").await?;
        Ok(identity.login)
    }

    /// Repositories visible to the credential's owner
    pub async fn try_list_repositories(&self, credential: &str) -> Result<Vec<Repository>> {
        self.get_json(
            credential,
            &format!("/user/repos?per_page={}&sort=updated", PAGE_SIZE),
        )
        .await
    }

    /// Branches of `owner/repo`
    pub async fn try_list_branches(&self, credential: &str, full_name: &str) -> Result<Vec<Branch>> {
        self.get_json(
            credential,
            &format!("/repos/{}/branches?per_page={}", full_name.trim_matches('/'), PAGE_SIZE),
        )
        .await
    }

    /// Create a repository owned by the credential's owner
    ///
    /// The repository is created empty so the scaffolded history can be
    /// pushed without conflicts.
    pub async fn try_create_repository(
        &self,
        credential: &str,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<CreatedRepository> {
        if !credential_is_configured(credential) {
            return Err(Error::NotConfigured);
        }

        info!("Creating repository: {}", name);
        let body = CreateRepositoryRequest {
            name,
            description,
            private,
            auto_init: false,
        };

        let response = self
            .request(Method::POST, "/user/repos", credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED && !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::status("/user/repos", status.as_u16(), body));
        }

        let created: CreatedRepository = response.json().await?;
        info!("Repository created: {}", created.html_url);
        Ok(created)
    }

    /// Login name of the credential's owner, or `None` on any failure
    pub async fn get_identity(&self, credential: &str) -> Option<String> {
        lenient("identity lookup", self.try_get_identity(credential).await)
    }

    /// Repositories visible to the credential's owner; empty on any failure
    pub async fn list_repositories(&self, credential: &str) -> Vec<Repository> {
        lenient("repository listing", self.try_list_repositories(credential).await)
            .unwrap_or_default()
    }

    /// Branches of `owner/repo`; empty on any failure
    pub async fn list_branches(&self, credential: &str, full_name: &str) -> Vec<Branch> {
        lenient(
            "branch listing",
            self.try_list_branches(credential, full_name).await,
        )
        .unwrap_or_default()
    }

    /// Create a repository, or `None` on any failure
    pub async fn create_repository(
        &self,
        credential: &str,
        name: &str,
        description: &str,
        private: bool,
    ) -> Option<CreatedRepository> {
        lenient(
            "repository creation",
            self.try_create_repository(credential, name, description, private)
                .await,
        )
    }

    /// Whether the credential authenticates successfully
    pub async fn validate_credential(&self, credential: &str) -> bool {
        self.get_identity(credential).await.is_some()
    }
}

fn lenient<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(Error::NotConfigured) => {
            debug!("Skipping {}: credential not configured", what);
            None
        }
        Err(e) => {
            warn!("{} failed: {}", what, e);
            None
        }
    }
}

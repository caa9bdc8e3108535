//! CLI command implementations

pub mod branches;
pub mod config;
pub mod new;
pub mod repos;
pub mod serve;
pub mod templates;
pub mod token;

use anyhow::{Context, Result};
use projwiz_core::config::WizardConfig;
use projwiz_github::GitHubClient;

/// Hosted-repository client for the configured API
pub(crate) fn github_client(config: &WizardConfig) -> Result<GitHubClient> {
    GitHubClient::new(&config.hosted_api_url)
        .with_context(|| format!("Failed to build client for {}", config.hosted_api_url))
}

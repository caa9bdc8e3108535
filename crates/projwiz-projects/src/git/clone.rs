//! Template cloning

use super::{Git, CLONE_TIMEOUT};
use crate::error::{Error, Result};
use camino::Utf8Path;
use tracing::info;

/// Clone URL for a template reference
///
/// Full URLs (`https://...`, `ssh://...`, `git@host:...`) are used as
/// given; anything else is treated as an `owner/repo` path on GitHub.
pub fn template_clone_url(template_repo: &str) -> String {
    let repo = template_repo.trim();
    if repo.contains("://") || repo.starts_with("git@") {
        repo.to_string()
    } else {
        format!(
            "https://github.com/{}.git",
            repo.trim_matches('/').trim_end_matches(".git")
        )
    }
}

impl Git {
    /// Clone `url` at `branch` into `destination`
    ///
    /// # Arguments
    /// * `url` - Repository URL to clone
    /// * `branch` - Branch to check out
    /// * `destination` - Empty or missing directory to clone into
    ///
    /// # Errors
    /// Returns error if git cannot be run or the clone fails
    pub async fn clone_template(&self, url: &str, branch: &str, destination: &Utf8Path) -> Result<()> {
        info!("Cloning template: {} ({}) -> {}", url, branch, destination);

        let spec = self
            .network(None, url)
            .args(["clone", "--branch", branch, "--", url, destination.as_str()])
            .timeout(CLONE_TIMEOUT);
        let output = self.runner.run(spec).await?;

        if !output.success() {
            return Err(Error::clone_failed(output.failure_message()));
        }

        info!("Template cloned successfully");
        Ok(())
    }
}

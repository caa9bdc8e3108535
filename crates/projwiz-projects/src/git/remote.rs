//! Remote management and pushing

use super::Git;
use crate::error::{Error, Result};
use camino::Utf8Path;
use tracing::{debug, info, warn};

/// Name of the remote the project is published to
pub const ORIGIN: &str = "origin";

/// How a push went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// The remote had unrelated history that was merged before pushing
    PushedAfterPull,
}

/// Whether push output reports a rejection caused by remote history
pub fn is_diverged_rejection(stderr: &str) -> bool {
    stderr.contains("rejected")
        && (stderr.contains("fetch first") || stderr.contains("non-fast-forward"))
}

impl Git {
    /// Point `origin` at `url`, replacing any existing origin
    pub async fn set_origin(&self, dir: &Utf8Path, url: &str) -> Result<()> {
        info!("Setting remote '{}': {}", ORIGIN, url);

        let removed = self
            .runner
            .run(self.local(dir).args(["remote", "remove", ORIGIN]))
            .await?;
        if !removed.success() {
            debug!("No existing '{}' remote to remove", ORIGIN);
        }

        self.run(
            self.local(dir).args(["remote", "add", ORIGIN, url]),
            "git remote add",
        )
        .await?;
        Ok(())
    }

    /// Currently checked out branch, `main` when it cannot be determined
    pub async fn current_branch(&self, dir: &Utf8Path) -> String {
        let spec = self.local(dir).args(["rev-parse", "--abbrev-ref", "HEAD"]);
        match self.run(spec, "git rev-parse").await {
            Ok(output) if !output.stdout.trim().is_empty() && output.stdout.trim() != "HEAD" => {
                output.stdout.trim().to_string()
            }
            _ => "main".to_string(),
        }
    }

    /// Push `branch` to origin at `remote_url`
    ///
    /// When the remote rejects the push because it has history of its own,
    /// pulls with `--allow-unrelated-histories` and pushes once more.
    ///
    /// # Errors
    /// Returns error if the push fails, or if the pull or retried push fails
    pub async fn push_with_pull_retry(
        &self,
        dir: &Utf8Path,
        remote_url: &str,
        branch: &str,
    ) -> Result<PushOutcome> {
        info!("Pushing {} to {}", branch, remote_url);

        let push = || {
            self.network(Some(dir), remote_url)
                .args(["push", "-u", ORIGIN, branch])
        };

        let first = self.runner.run(push()).await?;
        if first.success() {
            return Ok(PushOutcome::Pushed);
        }
        if !is_diverged_rejection(&first.stderr) {
            return Err(Error::push_rejected(first.failure_message()));
        }

        warn!("Remote has history of its own, pulling before pushing again");
        let pull = self.network(Some(dir), remote_url).args([
            "pull",
            "--no-rebase",
            "--no-edit",
            ORIGIN,
            branch,
            "--allow-unrelated-histories",
        ]);
        self.run(pull, "git pull").await?;

        let second = self.runner.run(push()).await?;
        if !second.success() {
            return Err(Error::push_rejected(second.failure_message()));
        }
        Ok(PushOutcome::PushedAfterPull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverged_rejection_detection() {
        let fetch_first = " ! [rejected]        main -> main (fetch first)\nerror: failed to push some refs";
        assert!(is_diverged_rejection(fetch_first));
        assert!(is_diverged_rejection(" ! [rejected] main -> main (non-fast-forward)"));
        assert!(!is_diverged_rejection("fatal: Authentication failed"));
        assert!(!is_diverged_rejection(" ! [remote rejected] main -> main (pre-receive hook declined)"));
    }
}

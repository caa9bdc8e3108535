//! Repository initialization and commits

use super::Git;
use crate::error::Result;
use camino::Utf8Path;
use tracing::{debug, info};

/// What committing a working tree did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new repository was initialized with a first commit
    Initialized,
    /// Changes were committed to an existing repository
    Committed,
    /// The working tree was clean
    NothingToCommit,
}

impl CommitOutcome {
    pub fn describe(&self) -> &'static str {
        match self {
            CommitOutcome::Initialized => "initialized repository",
            CommitOutcome::Committed => "committed changes",
            CommitOutcome::NothingToCommit => "nothing to commit",
        }
    }
}

impl Git {
    /// Whether `dir` has uncommitted changes
    pub async fn has_changes(&self, dir: &Utf8Path) -> Result<bool> {
        let output = self
            .run(self.local(dir).args(["status", "--porcelain"]), "git status")
            .await?;
        Ok(!output.stdout.trim().is_empty())
    }

    /// Stage everything and commit it when anything changed
    ///
    /// # Returns
    /// Whether a commit was created
    pub async fn commit_all(&self, dir: &Utf8Path, message: &str) -> Result<bool> {
        self.run(self.local(dir).args(["add", "-A"]), "git add").await?;

        if !self.has_changes(dir).await? {
            debug!("No changes to commit in {}", dir);
            return Ok(false);
        }

        self.run(self.local(dir).args(["commit", "-m", message]), "git commit")
            .await?;
        info!("Committed: {}", message);
        Ok(true)
    }

    /// Commit the working tree, initializing a repository first if needed
    ///
    /// An existing repository gets a "Project setup" commit; a fresh one
    /// gets an "Initial commit". Author identity comes from the user's
    /// git configuration.
    pub async fn initialize_and_commit(&self, dir: &Utf8Path, project_name: &str) -> Result<CommitOutcome> {
        if dir.join(".git").exists() {
            let message = format!("Project setup for {}", project_name);
            return Ok(if self.commit_all(dir, &message).await? {
                CommitOutcome::Committed
            } else {
                CommitOutcome::NothingToCommit
            });
        }

        info!("Initializing git repository at: {}", dir);
        self.run(self.local(dir).arg("init"), "git init").await?;

        let message = format!("Initial commit for {}", project_name);
        Ok(if self.commit_all(dir, &message).await? {
            CommitOutcome::Initialized
        } else {
            CommitOutcome::NothingToCommit
        })
    }
}

//! Base build tags

use super::Git;
use crate::error::Result;
use camino::Utf8Path;
use chrono::NaiveDate;
use tracing::info;

/// Prefix of the tag marking a project's base build
pub const BASE_BUILD_PREFIX: &str = "base-build";

/// Tag name for a base build made on `date`
pub fn base_build_tag(date: NaiveDate) -> String {
    format!("{}-{}", BASE_BUILD_PREFIX, date.format("%Y-%m-%d"))
}

impl Git {
    /// Whether `tag` already exists in the repository at `dir`
    pub async fn tag_exists(&self, dir: &Utf8Path, tag: &str) -> Result<bool> {
        let reference = format!("refs/tags/{}", tag);
        let spec = self
            .local(dir)
            .args(["rev-parse", "-q", "--verify", reference.as_str()]);
        Ok(self.runner.run(spec).await?.success())
    }

    /// Create an annotated tag named `name`, or `{name}-{timestamp}` when
    /// `name` is taken
    ///
    /// # Returns
    /// The name of the created tag
    pub async fn create_tag(&self, dir: &Utf8Path, name: &str, message: &str, timestamp: i64) -> Result<String> {
        let tag = if self.tag_exists(dir, name).await? {
            let unique = format!("{}-{}", name, timestamp);
            info!("Tag {} already exists, using {}", name, unique);
            unique
        } else {
            name.to_string()
        };

        self.run(
            self.local(dir).args(["tag", "-a", tag.as_str(), "-m", message]),
            "git tag",
        )
        .await?;
        info!("Created tag: {}", tag);
        Ok(tag)
    }

    /// Push a tag to origin at `remote_url`
    pub async fn push_tag(&self, dir: &Utf8Path, remote_url: &str, tag: &str) -> Result<()> {
        let spec = self
            .network(Some(dir), remote_url)
            .args(["push", super::ORIGIN, tag]);
        self.run(spec, "git push tag").await?;
        Ok(())
    }
}

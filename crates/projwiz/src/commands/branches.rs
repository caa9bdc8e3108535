//! Branches command

use anyhow::{anyhow, Context, Result};
use projwiz_core::config::WizardConfig;

use crate::cli::BranchesArgs;
use crate::output;

pub async fn run(args: BranchesArgs, config: &WizardConfig) -> Result<()> {
    if !args.repo.contains('/') {
        return Err(anyhow!("Repository must be given as owner/repo, got '{}'", args.repo));
    }
    if !config.has_repo_credential() {
        return Err(anyhow!(
            "No repository credential configured. Run 'projwiz config set repoCredential <token>'"
        ));
    }

    let client = super::github_client(config)?;
    let branches = client
        .try_list_branches(&config.repo_credential, &args.repo)
        .await
        .with_context(|| format!("Failed to list branches of {}", args.repo))?;

    if branches.is_empty() {
        output::info(&format!("{} has no branches", args.repo));
        return Ok(());
    }

    output::header(&args.repo);
    for branch in branches {
        println!("  {}", branch.name);
    }
    Ok(())
}

//! Repositories command

use anyhow::{anyhow, Context, Result};
use projwiz_core::config::WizardConfig;
use tabled::{settings::Style, Table, Tabled};

use crate::output;

#[derive(Tabled)]
struct RepositoryRow {
    #[tabled(rename = "REPOSITORY")]
    full_name: String,
    #[tabled(rename = "DEFAULT BRANCH")]
    default_branch: String,
}

pub async fn run(config: &WizardConfig) -> Result<()> {
    if !config.has_repo_credential() {
        return Err(anyhow!(
            "No repository credential configured. Run 'projwiz config set repoCredential <token>'"
        ));
    }

    let spinner = output::spinner("Fetching repositories...");
    let client = super::github_client(config)?;
    let repositories = client
        .try_list_repositories(&config.repo_credential)
        .await
        .context("Failed to list repositories");
    spinner.finish_and_clear();

    let repositories = repositories?;
    if repositories.is_empty() {
        output::info("No repositories found");
        return Ok(());
    }

    let rows: Vec<RepositoryRow> = repositories
        .into_iter()
        .map(|r| RepositoryRow {
            full_name: r.full_name,
            default_branch: r.default_branch,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}

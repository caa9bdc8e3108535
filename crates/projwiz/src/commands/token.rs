//! Credential check command

use anyhow::{anyhow, Result};
use projwiz_core::config::{credential_is_configured, WizardConfig};

use crate::cli::TestTokenArgs;
use crate::output;

pub async fn run(args: TestTokenArgs, config: &WizardConfig) -> Result<()> {
    let token = args.token.unwrap_or_else(|| config.repo_credential.clone());
    if !credential_is_configured(&token) {
        return Err(anyhow!("No token given and none configured"));
    }

    let spinner = output::spinner("Checking token...");
    let client = super::github_client(config)?;
    let login = client.get_identity(&token).await;
    spinner.finish_and_clear();

    match login {
        Some(login) => {
            output::success(&format!("Token is valid (authenticated as {})", login));
            Ok(())
        }
        None => Err(anyhow!("Token was rejected by {}", client.api_url())),
    }
}

//! Serve command

use anyhow::{Context, Result};
use projwiz_core::config::{ConfigStore, WizardConfig};
use projwiz_core::process::SystemCommandRunner;
use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::output;
use crate::web::{self, AppState};

pub async fn run(args: ServeArgs, store: ConfigStore, config: WizardConfig) -> Result<()> {
    if !config.has_repo_credential() {
        output::warning("No repository credential configured; repository lists will be empty");
    }

    let state = Arc::new(AppState::new(store, config, Arc::new(SystemCommandRunner::new())));
    let (listener, port) = web::bind_with_fallback(&args.host, args.port)
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.host, args.port))?;

    if port != args.port {
        output::warning(&format!("Port {} is in use, using {}", args.port, port));
    }
    output::success(&format!("Listening on http://{}:{}", args.host, port));

    web::serve(listener, state).await.context("Web server failed")
}

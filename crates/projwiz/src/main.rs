//! projwiz CLI - scaffold new projects from template repositories
//!
//! This is the main entry point for the projwiz command-line interface.

mod cli;
mod commands;
mod output;
mod web;

use anyhow::Result;
use clap::Parser;
use projwiz_core::config::ConfigStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before any TLS operation
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let store = cli.config.map(ConfigStore::new).unwrap_or_default();
    let config = store.load();

    match cli.command {
        Commands::New(args) => commands::new::run(args, config).await,
        Commands::Templates => commands::templates::run(&config),
        Commands::Repos => commands::repos::run(&config).await,
        Commands::Branches(args) => commands::branches::run(args, &config).await,
        Commands::TestToken(args) => commands::token::run(args, &config).await,
        Commands::Config(cmd) => commands::config::run(cmd, &store, config),
        Commands::Serve(args) => commands::serve::run(args, store, config).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

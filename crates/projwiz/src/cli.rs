//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// projwiz - scaffold new projects from template repositories
#[derive(Parser, Debug)]
#[command(name = "projwiz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the wizard config file (default: ./config.json)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project from a template
    New(NewArgs),

    /// List registered templates
    Templates,

    /// List repositories visible to the configured credential
    Repos,

    /// List branches of a repository
    Branches(BranchesArgs),

    /// Check a hosted-repository credential
    TestToken(TestTokenArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Serve the local web form
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Project name (lowercase letters, digits, hyphens)
    pub name: String,

    /// Organization domain used for bundle identifiers (default: config defaultOrg)
    #[arg(short, long)]
    pub org: Option<String>,

    /// Registered template name, `owner/repo`, or a clone URL
    #[arg(short, long)]
    pub template: String,

    /// Template branch to clone
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Project description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Provision a backend project
    #[arg(long)]
    pub backend: bool,

    /// Backend account (default: config backendAccount)
    #[arg(long)]
    pub backend_account: Option<String>,

    /// Skip version control (no commit history is published)
    #[arg(long)]
    pub no_git: bool,

    /// Create the remote repository as public
    #[arg(long)]
    pub public: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BranchesArgs {
    /// Repository as `owner/repo`
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct TestTokenArgs {
    /// Token to check (default: the configured credential)
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the configuration with the credential masked
    Show(ConfigShowArgs),

    /// Set a single value
    Set(ConfigSetArgs),

    /// Register or replace a template
    AddTemplate(AddTemplateArgs),

    /// Remove a registered template
    RemoveTemplate(RemoveTemplateArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Key, e.g. `repoCredential`, `backendAccount`, `defaultOrg`, `projectsDir`
    pub key: String,

    pub value: String,
}

#[derive(Args, Debug)]
pub struct AddTemplateArgs {
    pub name: String,

    /// Repository URL or `owner/repo`
    pub url: String,
}

#[derive(Args, Debug)]
pub struct RemoveTemplateArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on; the next free port is used when taken
    #[arg(short, long, default_value_t = crate::web::DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

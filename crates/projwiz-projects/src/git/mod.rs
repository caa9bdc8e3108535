//! Git operations for the project pipeline
//!
//! Every git invocation goes through a [`CommandRunner`] so the pipeline
//! can be exercised against a scripted git. Network commands carry the
//! repository credential as a one-off HTTP header (`-c
//! http.<origin>.extraheader=...`) which git never writes to the
//! repository config.
//!
//! # Example
//!
//! ```no_run
//! use projwiz_core::process::SystemCommandRunner;
//! use projwiz_projects::git::{template_clone_url, Git};
//! use std::sync::Arc;
//! use camino::Utf8Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let git = Git::new(Arc::new(SystemCommandRunner::new())).with_credential("ghp_example");
//! let url = template_clone_url("acme/flutter-template");
//! git.clone_template(&url, "main", Utf8Path::new("/tmp/demo-app")).await?;
//! # Ok(())
//! # }
//! ```

mod clone;
mod commit;
mod remote;
mod tag;

pub use clone::template_clone_url;
pub use commit::CommitOutcome;
pub use remote::{is_diverged_rejection, PushOutcome, ORIGIN};
pub use tag::{base_build_tag, BASE_BUILD_PREFIX};

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use camino::Utf8Path;
use projwiz_core::config::credential_is_configured;
use projwiz_core::process::{CommandOutput, CommandRunner, CommandSpec};
use std::sync::Arc;
use std::time::Duration;

/// Time allowed for cloning a template
pub const CLONE_TIMEOUT: Duration = Duration::from_secs(120);
/// Time allowed for push and pull
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(60);
/// Time allowed for purely local git commands
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Git command driver
#[derive(Clone)]
pub struct Git {
    runner: Arc<dyn CommandRunner>,
    credential: Option<String>,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            credential: None,
        }
    }

    /// Authenticate network commands with `credential` when it is configured
    pub fn with_credential(mut self, credential: &str) -> Self {
        self.credential = credential_is_configured(credential).then(|| credential.to_string());
        self
    }

    /// A git command run in `dir`
    fn local(&self, dir: &Utf8Path) -> CommandSpec {
        CommandSpec::new("git")
            .cwd(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .timeout(LOCAL_TIMEOUT)
    }

    /// A git command talking to `url`, authenticated when possible
    fn network(&self, dir: Option<&Utf8Path>, url: &str) -> CommandSpec {
        let mut spec = CommandSpec::new("git")
            .env("GIT_TERMINAL_PROMPT", "0")
            .timeout(NETWORK_TIMEOUT);
        if let Some(dir) = dir {
            spec = spec.cwd(dir);
        }
        if let Some(credential) = &self.credential {
            spec = spec.args(auth_header_args(credential, url));
        }
        spec
    }

    /// Run a git command, turning a nonzero exit into an error
    async fn run(&self, spec: CommandSpec, what: &str) -> Result<CommandOutput> {
        let output = self.runner.run(spec).await?;
        if !output.success() {
            return Err(Error::git_operation(format!(
                "{} failed: {}",
                what,
                output.failure_message()
            )));
        }
        Ok(output)
    }
}

/// `-c` arguments carrying `credential` as an HTTP header for `url`'s host
///
/// Returns nothing for non-HTTPS remotes.
pub fn auth_header_args(credential: &str, url: &str) -> Vec<String> {
    let Some(rest) = url.strip_prefix("https://") else {
        return Vec::new();
    };
    let host = rest.split('/').next().unwrap_or_default();
    let host = host.rsplit('@').next().unwrap_or(host);
    if host.is_empty() {
        return Vec::new();
    }

    let token = STANDARD.encode(format!("x-access-token:{}", credential));
    vec![
        "-c".to_string(),
        format!("http.https://{}/.extraheader=AUTHORIZATION: basic {}", host, token),
    ]
}

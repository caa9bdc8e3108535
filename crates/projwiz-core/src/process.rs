//! External command adapter
//!
//! Every interaction with `git` and the backend CLI goes through the
//! [`CommandRunner`] trait so pipelines can be driven by scripted runners
//! in tests. The system implementation enforces per-command timeouts and
//! kills the child when one expires.
//!
//! A nonzero exit status is not an error at this layer; callers inspect
//! [`CommandOutput::success`].

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

/// Errors raised while running an external command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The executable could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command did not exit before its timeout
    #[error("'{program}' timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    /// I/O failure while feeding input or collecting output
    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    pub fn timed_out(program: impl Into<String>, timeout: Duration) -> Self {
        Self::TimedOut {
            program: program.into(),
            timeout,
        }
    }

    pub fn io(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            program: program.into(),
            source,
        }
    }

    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// A command to run: program, arguments, and execution options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
    pub timeout: Option<Duration>,
    pub stdin: Option<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
            stdin: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    /// Text written to the child's standard input, which is then closed
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Command line suitable for logs, with credential headers masked
    pub fn display_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        for arg in &self.args {
            let lower = arg.to_ascii_lowercase();
            if lower.contains("extraheader") || lower.contains("authorization:") {
                parts.push("<redacted>".to_string());
            } else {
                parts.push(arg.clone());
            }
        }
        parts.join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Trimmed stderr, or stdout when stderr is empty
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion or until its timeout
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError>;
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
        (**self).run(spec).await
    }
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!("Running: {}", spec.display_line());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| CommandError::spawn(&spec.program, e))?;

        // Feeding stdin counts against the timeout
        let pipe = child.stdin.take();
        let input = spec.stdin.as_deref();
        let program = spec.program.as_str();
        let exchange = async move {
            if let (Some(input), Some(mut stdin)) = (input, pipe) {
                // A child that exits without reading its input closes the pipe
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    trace!("stdin write to '{}' failed: {}", program, e);
                }
            }
            child.wait_with_output().await
        };

        let output = match spec.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| CommandError::timed_out(&spec.program, limit))?,
            None => exchange.await,
        }
        .map_err(|e| CommandError::io(&spec.program, e))?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!(
            exit_code = result.exit_code,
            "'{}' finished",
            spec.program
        );
        Ok(result)
    }
}

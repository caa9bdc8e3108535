//! Common test helpers for projwiz-projects integration tests
//!
//! - A scripted [`CommandRunner`] standing in for git and the backend CLI,
//!   with replies that can touch the filesystem (a "clone" that writes a
//!   template tree)
//! - Wizard configuration fixtures rooted in a temporary directory
//! - wiremock helpers for the hosted-repository API

#![allow(dead_code)]

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use projwiz_core::config::WizardConfig;
use projwiz_core::process::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use serde_json::json;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "ghp_test_token";
pub const ACCOUNT: &str = "dev@acme.io";

type Effect = Arc<dyn Fn(&CommandSpec) -> Reply + Send + Sync>;

/// Scripted reply to a command
#[derive(Clone)]
pub enum Reply {
    Output(CommandOutput),
    Timeout,
    SpawnFailure,
    /// Computed from the command, possibly with side effects
    Effect(Effect),
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Output(CommandOutput::new(0, stdout, ""))
    }

    pub fn fail(stderr: &str) -> Self {
        Reply::Output(CommandOutput::new(1, "", stderr))
    }

    pub fn effect(f: impl Fn(&CommandSpec) -> Reply + Send + Sync + 'static) -> Self {
        Reply::Effect(Arc::new(f))
    }
}

struct Rule {
    needles: Vec<String>,
    replies: VecDeque<Reply>,
}

/// [`CommandRunner`] returning scripted replies
///
/// A rule matches when every needle equals one of the command's arguments.
/// Its replies are consumed in order and the last one repeats. Commands
/// without a matching rule succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for commands containing every needle
    pub fn on(self, needles: &[&str], reply: Reply) -> Self {
        {
            let mut rules = self.rules.lock().unwrap();
            let needles: Vec<String> = needles.iter().map(|s| s.to_string()).collect();
            match rules.iter_mut().find(|r| r.needles == needles) {
                Some(rule) => rule.replies.push_back(reply),
                None => rules.push(Rule {
                    needles,
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands containing every needle
    pub fn calls_matching(&self, needles: &[&str]) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|spec| matches(spec, needles))
            .collect()
    }

    /// Recorded invocations of `program`
    pub fn calls_to(&self, program: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|spec| spec.program == program)
            .collect()
    }

    pub fn assert_not_called(&self, needles: &[&str]) {
        let found = self.calls_matching(needles);
        assert!(
            found.is_empty(),
            "expected no command containing {:?}, got {:?}",
            needles,
            found
        );
    }

    fn reply_for(&self, spec: &CommandSpec) -> Reply {
        let mut rules = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            let needles: Vec<&str> = rule.needles.iter().map(String::as_str).collect();
            if matches(spec, &needles) {
                return if rule.replies.len() > 1 {
                    rule.replies.pop_front().unwrap()
                } else {
                    rule.replies[0].clone()
                };
            }
        }
        Reply::ok("")
    }
}

fn matches(spec: &CommandSpec, needles: &[&str]) -> bool {
    needles.iter().all(|n| spec.args.iter().any(|a| a == n))
}

fn resolve(reply: Reply, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
    match reply {
        Reply::Output(output) => Ok(output),
        Reply::Timeout => Err(CommandError::timed_out(
            &spec.program,
            spec.timeout.unwrap_or(Duration::from_secs(30)),
        )),
        Reply::SpawnFailure => Err(CommandError::spawn(
            &spec.program,
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        )),
        Reply::Effect(effect) => resolve(effect(spec), spec),
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        let reply = self.reply_for(&spec);
        resolve(reply, &spec)
    }
}

/// A "git clone" writing `files` (relative path, content) into the
/// destination, which is the command's last argument
pub fn clone_writing(files: &[(&str, &str)]) -> Reply {
    let files: Vec<(String, String)> = files
        .iter()
        .map(|(p, c)| (p.to_string(), c.to_string()))
        .collect();
    Reply::effect(move |spec| {
        let dest = Utf8PathBuf::from(spec.args.last().unwrap());
        fs::create_dir_all(dest.join(".git")).unwrap();
        for (relative, content) in &files {
            let path = dest.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Reply::ok("")
    })
}

/// Scripted git that clones `files` and behaves like a fresh checkout of `main`
pub fn git_cli(files: &[(&str, &str)]) -> ScriptedRunner {
    ScriptedRunner::new()
        .on(&["clone"], clone_writing(files))
        .on(&["status", "--porcelain"], Reply::ok(" M pubspec.yaml\n"))
        .on(&["rev-parse", "--abbrev-ref"], Reply::ok("main\n"))
        .on(&["rev-parse", "--verify"], Reply::fail(""))
}

/// Workspace holding a projects directory
pub struct Workspace {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Self { _dir: dir, root }
    }

    pub fn projects(&self) -> Utf8PathBuf {
        self.root.join("projects")
    }

    /// Config with no credentials, rooted in this workspace
    pub fn config(&self) -> WizardConfig {
        WizardConfig {
            projects_dir: self.projects().to_string(),
            ..WizardConfig::default()
        }
    }

    /// Entries currently in the projects directory
    pub fn project_entries(&self) -> Vec<String> {
        match fs::read_dir(self.projects()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn read(path: &Utf8Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// Mount `POST /user/repos` answering 201 for `name` under `owner`
pub async fn mock_create_repo(server: &MockServer, owner: &str, name: &str) {
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "html_url": format!("https://github.com/{}/{}", owner, name),
            "clone_url": format!("https://github.com/{}/{}.git", owner, name),
            "private": true
        })))
        .mount(server)
        .await;
}

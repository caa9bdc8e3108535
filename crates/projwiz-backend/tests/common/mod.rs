//! Common test helpers for projwiz-backend integration tests
//!
//! Provides a scripted [`CommandRunner`] standing in for the backend CLI:
//! - replies are queued per command, matched by argument
//! - every invocation is recorded for later assertions
//! - timeouts and spawn failures can be simulated

#![allow(dead_code)]

use async_trait::async_trait;
use camino::Utf8PathBuf;
use projwiz_core::process::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

pub const CLI: &str = "firebase";
pub const ACCOUNT: &str = "dev@acme.io";

/// Scripted reply to a command
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    Timeout,
    SpawnFailure,
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Output(CommandOutput::new(0, stdout, ""))
    }

    pub fn fail(stderr: &str) -> Self {
        Reply::Output(CommandOutput::new(1, "", stderr))
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

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        match self.reply_for(&spec) {
            Reply::Output(output) => Ok(output),
            Reply::Timeout => Err(CommandError::timed_out(
                &spec.program,
                spec.timeout.unwrap_or(Duration::from_secs(30)),
            )),
            Reply::SpawnFailure => Err(CommandError::spawn(
                &spec.program,
                io::Error::new(io::ErrorKind::NotFound, "not found"),
            )),
        }
    }
}

/// Empty project directory
pub fn project_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

pub const IOS_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>API_KEY</key>
	<string>AIzaSyIOSKEY</string>
	<key>GCM_SENDER_ID</key>
	<string>111222333444</string>
	<key>GOOGLE_APP_ID</key>
	<string>1:111222333444:ios:aaa111</string>
</dict>
</plist>"#;

pub const ANDROID_JSON: &str = r#"{
  "project_info": {"project_number": "111222333444", "api_key": "AIzaSyANDROIDKEY"},
  "client": [{"client_info": {"mobilesdk_app_id": "1:111222333444:android:bbb222"}}]
}"#;

pub const WEB_JS: &str = r#"firebase.initializeApp({
  "apiKey": "AIzaSyWEBKEY",
  "authDomain": "demo-app.firebaseapp.com",
  "appId": "1:111222333444:web:ccc333",
  "messagingSenderId": "111222333444"
});"#;

/// Runner scripting a CLI where every call succeeds
pub fn happy_cli() -> ScriptedRunner {
    ScriptedRunner::new()
        .on(&["apps:create", "ios"], Reply::ok("App ID: 1:111222333444:ios:aaa111"))
        .on(
            &["apps:create", "android"],
            Reply::ok("Created app\nApp ID: 1:111222333444:android:bbb222"),
        )
        .on(&["apps:create", "web"], Reply::ok("App ID: 1:111222333444:web:ccc333"))
        .on(&["apps:sdkconfig", "ios"], Reply::ok(IOS_PLIST))
        .on(&["apps:sdkconfig", "android"], Reply::ok(ANDROID_JSON))
        .on(&["apps:sdkconfig", "web"], Reply::ok(WEB_JS))
}

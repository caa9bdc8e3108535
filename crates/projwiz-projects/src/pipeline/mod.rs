//! The project creation pipeline
//!
//! One run turns a [`ProjectRequest`] into a project directory under the
//! configured projects directory:
//!
//! | Step | On failure |
//! |---|---|
//! | validate | fatal, nothing touched |
//! | clone into a temporary directory | fatal, temporary directory removed |
//! | rewrite identifiers and package metadata | degraded |
//! | commit | degraded |
//! | create hosted repository and point `origin` at it | degraded |
//! | provision the backend | degraded |
//! | commit backend changes, push | degraded |
//! | tag the base build | degraded |
//! | move into place | fatal if the temporary directory vanished |

mod request;
mod result;

pub use request::{is_valid_project_name, ProjectRequest};
pub use result::PipelineResult;

use crate::error::{Error, Result};
use crate::git::{base_build_tag, template_clone_url, Git, PushOutcome};
use crate::rewrite::{update_package_manifest, IdentifierRewriter, ProjectIdentity, SubstringRewriter};
use camino::{Utf8Path, Utf8PathBuf};
use projwiz_backend::{BackendProvisioner, ProvisionRequest};
use projwiz_core::config::{credential_is_configured, WizardConfig};
use projwiz_core::process::CommandRunner;
use projwiz_core::retry::RetryObserver;
use projwiz_core::types::{AppIds, RetryPolicy, StepCallback, StepLog, StepStatus};
use projwiz_github::GitHubClient;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{error, info, warn};

/// Published hosted repository
struct Remote {
    html_url: String,
    clone_url: String,
}

/// Runs project creation against one wizard configuration
pub struct ProjectPipeline {
    config: WizardConfig,
    runner: Arc<dyn CommandRunner>,
    rewriter: Box<dyn IdentifierRewriter>,
    backend_retry: Option<RetryPolicy>,
    backend_observer: Option<Arc<dyn RetryObserver>>,
    on_step: Option<StepCallback>,
}

impl ProjectPipeline {
    pub fn new(config: WizardConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            rewriter: Box::new(SubstringRewriter::new()),
            backend_retry: None,
            backend_observer: None,
            on_step: None,
        }
    }

    /// Use a different identifier rewriting strategy
    pub fn with_rewriter(mut self, rewriter: Box<dyn IdentifierRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Override the backend project creation retry policy
    pub fn with_backend_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.backend_retry = Some(policy);
        self
    }

    /// Observe backend project creation attempts
    pub fn with_backend_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.backend_observer = Some(observer);
        self
    }

    /// Report each step as it is recorded
    pub fn with_step_callback(mut self, callback: Option<StepCallback>) -> Self {
        self.on_step = callback;
        self
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    fn projects_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.config.projects_dir)
    }

    fn git(&self) -> Git {
        Git::new(self.runner.clone()).with_credential(&self.config.repo_credential)
    }

    /// Run the whole pipeline for `request`
    ///
    /// Never panics or returns an error: fatal failures come back as a
    /// result with `success: false` and the temporary directory removed.
    pub async fn run(&self, request: &ProjectRequest) -> PipelineResult {
        let mut log = StepLog::with_callback(self.on_step.clone());

        if let Err(e) = request.validate() {
            error!("Invalid project request: {}", e);
            log.record("validate", StepStatus::Failed, e.to_string());
            return PipelineResult::failed(e.to_string(), &log);
        }
        log.record("validate", StepStatus::Ok, "");

        info!("Creating project {} from {}@{}", request.name, request.template_repo, request.template_branch);

        let workdir = match self.clone_template(request).await {
            Ok(dir) => dir,
            Err(e) => {
                error!("{}", e);
                log.record("clone", StepStatus::Failed, e.to_string());
                return PipelineResult::failed(e.to_string(), &log);
            }
        };
        log.record(
            "clone",
            StepStatus::Ok,
            format!("{}@{}", request.template_repo, request.template_branch),
        );

        let project_dir = match Utf8Path::from_path(workdir.path()) {
            Some(path) => path.to_path_buf(),
            None => {
                let message = format!("non UTF-8 working directory: {}", workdir.path().display());
                log.record("clone", StepStatus::Failed, message.clone());
                return PipelineResult::failed(message, &log);
            }
        };

        let identity = ProjectIdentity {
            name: &request.name,
            org_domain: &request.org_domain,
            description: &request.description,
        };
        let mut rewrite = self.rewriter.rewrite(&project_dir, &identity);
        rewrite.merge(update_package_manifest(&project_dir, &identity));
        let status = if rewrite.warnings.is_empty() {
            StepStatus::Ok
        } else {
            StepStatus::Degraded
        };
        log.record("rewrite", status, rewrite.summary());

        let git = self.git();
        match git.initialize_and_commit(&project_dir, &request.name).await {
            Ok(outcome) => log.record("commit", StepStatus::Ok, outcome.describe()),
            Err(e) => {
                warn!("Could not commit project: {}", e);
                log.record("commit", StepStatus::Degraded, e.to_string());
            }
        }

        let remote = self.publish_remote(request, &git, &project_dir, &mut log).await;

        let (backend_project_id, app_ids) = self.provision_backend(request, &project_dir, &mut log).await;

        if app_ids.is_some() {
            let message = format!("Backend setup and configuration for {}", request.name);
            match git.commit_all(&project_dir, &message).await {
                Ok(true) => log.record("commit-backend", StepStatus::Ok, "committed changes"),
                Ok(false) => log.record("commit-backend", StepStatus::Skipped, "nothing to commit"),
                Err(e) => {
                    warn!("Could not commit backend changes: {}", e);
                    log.record("commit-backend", StepStatus::Degraded, e.to_string());
                }
            }
        }

        self.push(request, &git, &project_dir, remote.as_ref(), &mut log).await;
        let build_tag = self.tag(request, &git, &project_dir, remote.as_ref(), &mut log).await;

        let project_path = match self.finalize(workdir, &request.name, &mut log) {
            Ok(path) => path,
            Err(e) => {
                error!("{}", e);
                log.record("finalize", StepStatus::Failed, e.to_string());
                return PipelineResult::failed(e.to_string(), &log);
            }
        };

        info!("Project {} created at {}", request.name, project_path);
        PipelineResult {
            success: true,
            project_path: Some(project_path.to_string()),
            backend_project_id,
            app_ids,
            remote_repo_url: remote.map(|r| r.html_url),
            build_tag,
            step_log: log.lines(),
            steps: log.into_records(),
            error: None,
        }
    }

    /// Clone the template into a fresh temporary directory under the
    /// projects directory
    async fn clone_template(&self, request: &ProjectRequest) -> Result<TempDir> {
        let projects_dir = self.projects_dir();
        fs::create_dir_all(&projects_dir)?;

        let workdir = tempfile::Builder::new()
            .prefix(&format!(".{}-", request.name))
            .tempdir_in(&projects_dir)?;
        let destination = Utf8Path::from_path(workdir.path())
            .ok_or_else(|| Error::clone_failed("working directory path is not UTF-8"))?;

        let url = template_clone_url(&request.template_repo);
        // Dropping the TempDir on error removes the partial clone
        self.git()
            .clone_template(&url, &request.template_branch, destination)
            .await?;
        Ok(workdir)
    }

    async fn publish_remote(
        &self,
        request: &ProjectRequest,
        git: &Git,
        project_dir: &Utf8Path,
        log: &mut StepLog,
    ) -> Option<Remote> {
        const STEP: &str = "remote";

        if !request.init_version_control {
            log.record(STEP, StepStatus::Skipped, "version control disabled");
            return None;
        }
        if !credential_is_configured(&self.config.repo_credential) {
            log.record(STEP, StepStatus::Skipped, "no repository credential configured");
            return None;
        }

        let client = match GitHubClient::new(&self.config.hosted_api_url) {
            Ok(client) => client,
            Err(e) => {
                log.record(STEP, StepStatus::Degraded, e.to_string());
                return None;
            }
        };

        let Some(created) = client
            .create_repository(
                &self.config.repo_credential,
                &request.name,
                &request.repository_description(),
                request.private_repo,
            )
            .await
        else {
            log.record(STEP, StepStatus::Degraded, "repository could not be created");
            return None;
        };
        info!("Created repository {}", created.html_url);

        if let Err(e) = git.set_origin(project_dir, &created.clone_url).await {
            warn!("Could not point origin at {}: {}", created.clone_url, e);
            log.record(STEP, StepStatus::Degraded, e.to_string());
            return None;
        }

        log.record(STEP, StepStatus::Ok, created.html_url.as_str());
        Some(Remote {
            html_url: created.html_url,
            clone_url: created.clone_url,
        })
    }

    async fn provision_backend(
        &self,
        request: &ProjectRequest,
        project_dir: &Utf8Path,
        log: &mut StepLog,
    ) -> (Option<String>, Option<AppIds>) {
        if !request.setup_backend {
            log.record("backend", StepStatus::Skipped, "not requested");
            return (None, None);
        }

        let account = if request.backend_account.trim().is_empty() {
            self.config.backend_account.trim()
        } else {
            request.backend_account.trim()
        };
        if account.is_empty() {
            log.record("backend", StepStatus::Skipped, "no backend account configured");
            return (None, None);
        }

        let mut provisioner = BackendProvisioner::new(self.runner.clone(), &self.config.backend_cli, account)
            .with_step_callback(self.on_step.clone());
        if let Some(policy) = &self.backend_retry {
            provisioner = provisioner.with_retry_policy(*policy);
        }
        if let Some(observer) = &self.backend_observer {
            provisioner = provisioner.with_observer(observer.clone());
        }

        let report = provisioner
            .provision(ProvisionRequest {
                project_dir,
                name: &request.name,
                org_domain: &request.org_domain,
            })
            .await;

        let project_id = report.project_id.clone();
        let app_ids = report.project_id.is_some().then(|| report.app_ids.clone());
        // The provisioner already reported these through the callback
        log.append_reported(report.steps);
        (project_id, app_ids)
    }

    async fn push(
        &self,
        request: &ProjectRequest,
        git: &Git,
        project_dir: &Utf8Path,
        remote: Option<&Remote>,
        log: &mut StepLog,
    ) {
        const STEP: &str = "push";

        if !request.init_version_control {
            log.record(STEP, StepStatus::Skipped, "version control disabled");
            return;
        }
        let Some(remote) = remote else {
            log.record(STEP, StepStatus::Skipped, "no remote repository");
            return;
        };

        let branch = git.current_branch(project_dir).await;
        match git.push_with_pull_retry(project_dir, &remote.clone_url, &branch).await {
            Ok(PushOutcome::Pushed) => log.record(STEP, StepStatus::Ok, branch),
            Ok(PushOutcome::PushedAfterPull) => log.record(
                STEP,
                StepStatus::Ok,
                format!("{} (after merging remote history)", branch),
            ),
            Err(e) => {
                warn!("Changes are committed locally but not pushed: {}", e);
                log.record(STEP, StepStatus::Degraded, e.to_string());
            }
        }
    }

    async fn tag(
        &self,
        request: &ProjectRequest,
        git: &Git,
        project_dir: &Utf8Path,
        remote: Option<&Remote>,
        log: &mut StepLog,
    ) -> Option<String> {
        const STEP: &str = "tag";

        if !request.init_version_control {
            log.record(STEP, StepStatus::Skipped, "version control disabled");
            return None;
        }

        let now = chrono::Local::now();
        let name = base_build_tag(now.date_naive());
        let message = format!(
            "Base build for {} - {}",
            request.name,
            now.format("%Y-%m-%dT%H:%M:%S")
        );

        let tag = match git.create_tag(project_dir, &name, &message, now.timestamp()).await {
            Ok(tag) => tag,
            Err(e) => {
                warn!("Could not create base build tag: {}", e);
                log.record(STEP, StepStatus::Degraded, e.to_string());
                return None;
            }
        };

        match remote {
            Some(remote) => match git.push_tag(project_dir, &remote.clone_url, &tag).await {
                Ok(()) => log.record(STEP, StepStatus::Ok, format!("{} (pushed)", tag)),
                Err(e) => {
                    warn!("Could not push tag {}: {}", tag, e);
                    log.record(STEP, StepStatus::Degraded, format!("{} not pushed: {}", tag, e));
                }
            },
            None => log.record(STEP, StepStatus::Ok, tag.as_str()),
        }
        Some(tag)
    }

    /// Move the working directory to `projects_dir/name`, replacing any
    /// existing project of that name.
    ///
    /// When the move fails the finished project stays in the working
    /// directory and that path is reported instead.
    fn finalize(&self, workdir: TempDir, name: &str, log: &mut StepLog) -> Result<Utf8PathBuf> {
        const STEP: &str = "finalize";

        let source = workdir.keep();
        if !source.is_dir() {
            return Err(Error::working_dir_vanished(source.display().to_string()));
        }

        let target = self.projects_dir().join(name);
        match replace_dir(&source, &target) {
            Ok(()) => {
                log.record(STEP, StepStatus::Ok, target.as_str());
                Ok(target)
            }
            Err(e) => {
                let kept = Utf8PathBuf::from_path_buf(source).map_err(|p| {
                    Error::from(std::io::Error::other(format!(
                        "non UTF-8 working directory {}",
                        p.display()
                    )))
                })?;
                warn!("Could not move project to {}: {}; keeping {}", target, e, kept);
                log.record(STEP, StepStatus::Degraded, format!("kept at {}: {}", kept, e));
                Ok(kept)
            }
        }
    }
}

fn replace_dir(source: &std::path::Path, target: &Utf8Path) -> std::io::Result<()> {
    if target.exists() {
        info!("Replacing existing project at {}", target);
        fs::remove_dir_all(target)?;
    }
    fs::rename(source, target)
}

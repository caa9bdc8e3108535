//! Backend provisioning through the backend CLI
//!
//! A provisioning run is strictly sequential:
//!
//! 1. create the project (retried, the only stage that can abort the run)
//! 2. write backend scaffold files into the project
//! 3. register the iOS, Android, and Web apps
//! 4. create the document database and deploy its rules
//! 5. download each app's SDK config
//! 6. merge credentials into the consolidated app config
//!
//! Every stage after the first is best-effort: failures are recorded as
//! degraded steps and the run continues.

use crate::app_id::AppIdExtractor;
use crate::consolidated::{merge_backend_config, MergeInput};
use crate::error::{Error, Result};
use crate::scaffold::{ensure_backend_files, write_if_absent, FIRESTORE_RULES};
use crate::sdk_config::{parse_sdk_config, BackendCredentials};
use camino::Utf8Path;
use projwiz_core::process::{CommandOutput, CommandRunner, CommandSpec};
use projwiz_core::retry::{RetryExecutorBuilder, RetryObserver, TracingObserver};
use projwiz_core::types::{
    AppIds, Platform, RetryPolicy, StepCallback, StepLog, StepRecord, StepStatus, UNKNOWN,
};
use rand::Rng;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Time allowed for a single project creation attempt
pub const PROJECT_CREATE_TIMEOUT: Duration = Duration::from_secs(120);
/// Time allowed for iOS app registration
pub const IOS_APP_TIMEOUT: Duration = Duration::from_secs(90);
/// Time allowed for Android and Web app registration
pub const APP_TIMEOUT: Duration = Duration::from_secs(60);
/// Time allowed for listing databases and downloading SDK configs
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);
/// Time allowed for database creation and rules deployment
pub const DATABASE_TIMEOUT: Duration = Duration::from_secs(60);

/// Region new document databases are created in
pub const DATABASE_LOCATION: &str = "us-central1";

/// Project creation attempts and the pause between them
pub fn project_retry_policy() -> RetryPolicy {
    RetryPolicy::fixed(3, 2000)
}

/// Candidate project id: `{name}-{6 random digits}`
pub fn project_id_candidate(name: &str) -> String {
    let suffix: u32 = rand::rng().random_range(100_000..=999_999);
    format!("{}-{}", name, suffix)
}

/// Display name for a project; the backend rejects names under 4 characters
pub fn project_display_name(name: &str) -> String {
    if name.chars().count() >= 4 {
        name.to_string()
    } else {
        format!("{}-project", name)
    }
}

/// Bundle / package identifier for a project's apps
pub fn bundle_id(org_domain: &str, name: &str) -> String {
    format!("com.{}.{}", org_domain, name)
}

/// Project to provision for
#[derive(Debug, Clone, Copy)]
pub struct ProvisionRequest<'a> {
    pub project_dir: &'a Utf8Path,
    pub name: &'a str,
    pub org_domain: &'a str,
}

/// Result of a provisioning run
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    /// Created project id; `None` when project creation failed
    pub project_id: Option<String>,
    pub app_ids: AppIds,
    /// Platforms whose SDK config was downloaded
    pub downloaded: Vec<Platform>,
    /// Outcome of the database stage
    pub database: StepStatus,
    pub steps: Vec<StepRecord>,
}

impl Default for ProvisionReport {
    fn default() -> Self {
        Self {
            project_id: None,
            app_ids: AppIds::default(),
            downloaded: Vec::new(),
            database: StepStatus::Skipped,
            steps: Vec::new(),
        }
    }
}

impl ProvisionReport {
    /// Whether the backend project exists
    pub fn project_created(&self) -> bool {
        self.project_id.is_some()
    }
}

/// Drives the backend CLI for one account
pub struct BackendProvisioner {
    runner: Arc<dyn CommandRunner>,
    cli: String,
    account: String,
    retry_policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
    extractor: AppIdExtractor,
    on_step: Option<StepCallback>,
}

impl BackendProvisioner {
    /// Create a provisioner invoking `cli` as `account`
    pub fn new(runner: Arc<dyn CommandRunner>, cli: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            runner,
            cli: cli.into(),
            account: account.into(),
            retry_policy: project_retry_policy(),
            observer: Arc::new(TracingObserver::new("create-backend-project")),
            extractor: AppIdExtractor::new(),
            on_step: None,
        }
    }

    /// Override the project creation retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Observe project creation attempts
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use a custom app id extractor
    pub fn with_extractor(mut self, extractor: AppIdExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Report each step as it is recorded
    pub fn with_step_callback(mut self, callback: Option<StepCallback>) -> Self {
        self.on_step = callback;
        self
    }

    fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(&self.cli)
            .args(["--account", self.account.as_str()])
            .args(args)
    }

    /// Run a CLI command, turning a nonzero exit into an error
    async fn run_checked(&self, spec: CommandSpec) -> Result<CommandOutput> {
        let label = spec.args.get(2).cloned().unwrap_or_else(|| self.cli.clone());
        let output = self.runner.run(spec).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::command_failed(label, output.failure_message()))
        }
    }

    /// Create the backend project, retrying with a fresh id each attempt
    ///
    /// # Returns
    /// The id of the created project
    ///
    /// # Errors
    /// Returns the last attempt's error once every attempt has failed
    pub async fn create_project(&self, name: &str) -> Result<String> {
        let display_name = project_display_name(name);
        let executor = RetryExecutorBuilder::new()
            .with_policy(self.retry_policy)
            .with_observer(self.observer.clone())
            .build();

        let result = executor
            .execute(|| {
                let project_id = project_id_candidate(name);
                let spec = self
                    .command([
                        "projects:create",
                        project_id.as_str(),
                        "--display-name",
                        display_name.as_str(),
                    ])
                    .timeout(PROJECT_CREATE_TIMEOUT);
                async move {
                    info!("Creating backend project: {}", project_id);
                    match self.runner.run(spec).await {
                        Ok(output) if output.success() => Ok(project_id),
                        Ok(output) => Err(Error::project_creation(
                            project_id,
                            output.failure_message(),
                        )),
                        Err(e) => Err(Error::project_creation(project_id, e.to_string())),
                    }
                }
            })
            .await;

        result.map_err(|e| e.into_source())
    }

    /// Register one platform app and extract its id from the CLI output
    pub async fn create_app(
        &self,
        platform: Platform,
        project_id: &str,
        name: &str,
        org_domain: &str,
    ) -> Result<String> {
        let bundle = bundle_id(org_domain, name);
        let app_name = format!("{}-{}", name, platform);

        let spec = match platform {
            Platform::Ios => self
                .command([
                    "apps:create",
                    "ios",
                    app_name.as_str(),
                    "--bundle-id",
                    bundle.as_str(),
                    "--project",
                    project_id,
                ])
                .stdin("\n")
                .timeout(IOS_APP_TIMEOUT),
            Platform::Android => self
                .command([
                    "apps:create",
                    "android",
                    app_name.as_str(),
                    "--package-name",
                    bundle.as_str(),
                    "--project",
                    project_id,
                ])
                .timeout(APP_TIMEOUT),
            Platform::Web => self
                .command(["apps:create", "web", app_name.as_str(), "--project", project_id])
                .timeout(APP_TIMEOUT),
        };

        let output = self.run_checked(spec).await?;
        Ok(self.extractor.extract(&output.stdout))
    }

    /// Register every platform app; failures leave that platform unknown
    pub async fn create_apps(
        &self,
        project_id: &str,
        name: &str,
        org_domain: &str,
        log: &mut StepLog,
    ) -> AppIds {
        let mut ids = AppIds::default();

        for platform in Platform::ALL {
            let step = format!("backend:app:{}", platform);
            match self.create_app(platform, project_id, name, org_domain).await {
                Ok(id) if id != UNKNOWN => {
                    info!("{} app id: {}", platform, id);
                    log.record(step, StepStatus::Ok, id.clone());
                    ids.set(platform, id);
                }
                Ok(_) => {
                    warn!("Created {} app but could not read its id", platform);
                    log.record(step, StepStatus::Degraded, "app id not found in output");
                }
                Err(e) => {
                    warn!("Failed to create {} app: {}", platform, e);
                    log.record(step, StepStatus::Degraded, e.to_string());
                }
            }
        }

        ids
    }

    /// Make sure the default document database exists and deploy its rules
    pub async fn ensure_database(&self, project_id: &str, project_dir: &Utf8Path) -> StepRecord {
        const STEP: &str = "backend:database";

        let list = self
            .command(["firestore:databases:list", "--project", project_id])
            .timeout(QUERY_TIMEOUT);
        match self.run_checked(list).await {
            Ok(output) if output.stdout.contains("default") => {
                info!("Default database already exists for {}", project_id);
                return StepRecord::new(STEP, StepStatus::Ok, "already exists");
            }
            Ok(_) => {}
            Err(e) => warn!("Could not list databases: {}", e),
        }

        let create = self
            .command([
                "firestore:databases:create",
                "(default)",
                "--location",
                DATABASE_LOCATION,
                "--project",
                project_id,
            ])
            .timeout(DATABASE_TIMEOUT);
        if let Err(e) = self.run_checked(create).await {
            warn!("Could not create database: {}", e);
            return StepRecord::new(STEP, StepStatus::Degraded, e.to_string());
        }
        info!("Created default database in {}", DATABASE_LOCATION);

        if let Err(e) = write_if_absent(project_dir, "firestore.rules", FIRESTORE_RULES) {
            warn!("Could not write firestore.rules: {}", e);
            return StepRecord::new(STEP, StepStatus::Degraded, format!("rules not written: {}", e));
        }

        let deploy = self
            .command(["deploy", "--only", "firestore:rules", "--project", project_id])
            .cwd(project_dir)
            .timeout(DATABASE_TIMEOUT);
        match self.run_checked(deploy).await {
            Ok(_) => StepRecord::new(STEP, StepStatus::Ok, format!("created in {}", DATABASE_LOCATION)),
            Err(e) => {
                warn!("Could not deploy database rules: {}", e);
                StepRecord::new(STEP, StepStatus::Degraded, format!("rules not deployed: {}", e))
            }
        }
    }

    /// Download the SDK config of every known app into the project
    ///
    /// # Returns
    /// Platforms that were downloaded, and the credentials parsed from them
    pub async fn download_sdk_configs(
        &self,
        project_dir: &Utf8Path,
        project_id: &str,
        name: &str,
        org_domain: &str,
        app_ids: &AppIds,
        log: &mut StepLog,
    ) -> (Vec<Platform>, BackendCredentials) {
        let bundle = bundle_id(org_domain, name);
        let mut downloaded = Vec::new();
        let mut credentials = BackendCredentials::default();

        for platform in Platform::ALL {
            let step = format!("backend:sdkconfig:{}", platform);
            if !app_ids.is_known(platform) {
                log.record(step, StepStatus::Skipped, "no app id");
                continue;
            }

            let spec = self
                .command([
                    "apps:sdkconfig",
                    platform.as_str(),
                    app_ids.get(platform),
                    "--project",
                    project_id,
                ])
                .timeout(QUERY_TIMEOUT);

            let output = match self.run_checked(spec).await {
                Ok(output) => output,
                Err(e) => {
                    warn!("Could not download {} SDK config: {}", platform, e);
                    log.record(step, StepStatus::Degraded, e.to_string());
                    continue;
                }
            };

            let target = project_dir.join(platform.sdk_config_path());
            let written = target
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(&target, &output.stdout));
            if let Err(e) = written {
                warn!("Could not write {}: {}", target, e);
                log.record(step, StepStatus::Degraded, e.to_string());
                continue;
            }

            if let Some(set) = parse_sdk_config(platform, &output.stdout, project_id, &bundle) {
                credentials.set(platform, set);
            }
            log.record(step, StepStatus::Ok, platform.sdk_config_path());
            downloaded.push(platform);
        }

        (downloaded, credentials)
    }

    /// Run every provisioning stage for `request`
    pub async fn provision(&self, request: ProvisionRequest<'_>) -> ProvisionReport {
        let mut log = StepLog::with_callback(self.on_step.clone());
        let mut report = ProvisionReport::default();

        let project_id = match self.create_project(request.name).await {
            Ok(id) => {
                log.record("backend:project", StepStatus::Ok, id.clone());
                id
            }
            Err(e) => {
                warn!("Backend project creation failed: {}", e);
                log.record("backend:project", StepStatus::Degraded, e.to_string());
                report.steps = log.into_records();
                return report;
            }
        };

        match ensure_backend_files(request.project_dir) {
            Ok(created) => log.record(
                "backend:scaffold",
                StepStatus::Ok,
                format!("{} file(s) created", created.len()),
            ),
            Err(e) => log.record("backend:scaffold", StepStatus::Degraded, e.to_string()),
        }

        let app_ids = self
            .create_apps(&project_id, request.name, request.org_domain, &mut log)
            .await;

        let database = self.ensure_database(&project_id, request.project_dir).await;
        report.database = database.status;
        log.push(database);

        let (downloaded, credentials) = self
            .download_sdk_configs(
                request.project_dir,
                &project_id,
                request.name,
                request.org_domain,
                &app_ids,
                &mut log,
            )
            .await;

        let merge = MergeInput {
            project_id: &project_id,
            project_name: request.name,
            org_domain: request.org_domain,
            app_ids: &app_ids,
            credentials: &credentials,
        };
        match merge_backend_config(request.project_dir, &merge) {
            Ok(outcome) => {
                let detail = if credentials.is_empty() {
                    "fallback credentials"
                } else {
                    "downloaded credentials"
                };
                let status = if outcome.changed { "updated" } else { "unchanged" };
                log.record(
                    "backend:config-merge",
                    StepStatus::Ok,
                    format!("{} ({})", status, detail),
                );
            }
            Err(e) => {
                warn!("Could not merge backend config: {}", e);
                log.record("backend:config-merge", StepStatus::Degraded, e.to_string());
            }
        }

        report.project_id = Some(project_id);
        report.app_ids = app_ids;
        report.downloaded = downloaded;
        report.steps = log.into_records();
        report
    }
}

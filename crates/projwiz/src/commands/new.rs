//! New project command

use anyhow::{anyhow, Context, Result};
use projwiz_core::config::WizardConfig;
use projwiz_core::process::{CommandRunner, SystemCommandRunner};
use projwiz_core::types::{StepCallback, StepRecord, StepStatus};
use projwiz_projects::{PipelineResult, ProjectPipeline, ProjectRequest};
use std::sync::Arc;

use crate::cli::NewArgs;
use crate::output;

pub async fn run(args: NewArgs, config: WizardConfig) -> Result<()> {
    let request = build_request(&args, &config);

    let spinner = (!args.json).then(|| output::spinner(&format!("Creating {}...", request.name)));
    let callback: Option<StepCallback> = spinner.clone().map(|pb| {
        Arc::new(move |record: &StepRecord| {
            pb.println(output::step_line(record));
            pb.set_message(format!("{}...", record.step));
        }) as StepCallback
    });

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    let pipeline = ProjectPipeline::new(config, runner).with_step_callback(callback);
    let result = pipeline.run(&request).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", json);
    } else {
        print_summary(&request, &result);
    }

    if result.success {
        Ok(())
    } else {
        Err(anyhow!(
            "Project creation failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Turn parsed arguments into a pipeline request
fn build_request(args: &NewArgs, config: &WizardConfig) -> ProjectRequest {
    let org = args.org.clone().unwrap_or_else(|| config.default_org.clone());
    let mut request = ProjectRequest::new(
        &args.name,
        org,
        resolve_template(config, &args.template),
        &args.branch,
    );
    request.description = args.description.clone();
    request.backend_account = args.backend_account.clone().unwrap_or_default();
    request.setup_backend = args.backend;
    request.init_version_control = !args.no_git;
    request.private_repo = !args.public;
    request
}

/// Registered template name to its URL; anything else passes through
fn resolve_template(config: &WizardConfig, template: &str) -> String {
    config
        .templates
        .get(template)
        .cloned()
        .unwrap_or_else(|| template.to_string())
}

fn print_summary(request: &ProjectRequest, result: &PipelineResult) {
    if !result.success {
        output::error(&format!(
            "Failed to create {}: {}",
            request.name,
            result.error.as_deref().unwrap_or("unknown error")
        ));
        return;
    }

    output::success(&format!("Created {}", request.name));
    if let Some(path) = &result.project_path {
        output::kv("Path", path);
    }
    if let Some(url) = &result.remote_repo_url {
        output::kv("Repository", url);
    }
    if let Some(tag) = &result.build_tag {
        output::kv("Build tag", tag);
    }
    if let Some(project_id) = &result.backend_project_id {
        output::kv("Backend project", project_id);
    }
    if let Some(ids) = &result.app_ids {
        output::kv("iOS app", &ids.ios);
        output::kv("Android app", &ids.android);
        output::kv("Web app", &ids.web);
    }

    let degraded: Vec<&StepRecord> = result
        .steps
        .iter()
        .filter(|r| r.status == StepStatus::Degraded)
        .collect();
    if !degraded.is_empty() {
        output::header("Needs attention");
        for record in degraded {
            output::warning(&format!("{}: {}", record.step, record.detail));
        }
    }
}

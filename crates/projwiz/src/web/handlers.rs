//! Request handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use projwiz_core::config::{RedactedConfig, WizardConfig, REDACTED};
use projwiz_core::types::StepLog;
use projwiz_github::{Branch, GitHubClient, Repository};
use projwiz_projects::{PipelineResult, ProjectPipeline, ProjectRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use super::SharedState;

const INDEX_HTML: &str = include_str!("index.html");

/// `{success, message}` body of the action endpoints
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }

    fn failure(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenCheck {
    #[serde(default)]
    token: String,
}

fn github_client(config: &WizardConfig) -> Option<GitHubClient> {
    match GitHubClient::new(&config.hosted_api_url) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Failed to build client for {}: {}", config.hosted_api_url, e);
            None
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn templates(State(state): State<SharedState>) -> Json<BTreeMap<String, String>> {
    Json(state.config.read().await.templates.clone())
}

pub async fn repositories(State(state): State<SharedState>) -> Json<Vec<Repository>> {
    let config = state.snapshot().await;
    let Some(client) = github_client(&config) else {
        return Json(Vec::new());
    };
    Json(client.list_repositories(&config.repo_credential).await)
}

pub async fn branches(
    State(state): State<SharedState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Json<Vec<Branch>> {
    let config = state.snapshot().await;
    let Some(client) = github_client(&config) else {
        return Json(Vec::new());
    };
    let full_name = format!("{}/{}", owner, repo);
    Json(client.list_branches(&config.repo_credential, &full_name).await)
}

pub async fn config(State(state): State<SharedState>) -> Json<RedactedConfig> {
    Json(state.config.read().await.redacted())
}

/// Run the pipeline on its own task so a panic inside it still produces a
/// response
pub async fn create_project(
    State(state): State<SharedState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> (StatusCode, Json<PipelineResult>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected project request: {}", rejection.body_text());
            let result = PipelineResult::failed(rejection.body_text(), &StepLog::new());
            return (StatusCode::BAD_REQUEST, Json(result));
        }
    };

    info!("Web request to create {}", request.name);
    let config = state.snapshot().await;
    let runner = state.runner.clone();
    let task = tokio::spawn(async move {
        ProjectPipeline::new(config, runner).run(&request).await
    });

    match task.await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            error!("Project creation task failed: {}", e);
            let result = PipelineResult::failed(
                format!("Project creation task failed: {}", e),
                &StepLog::new(),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(result))
        }
    }
}

pub async fn save_config(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ActionResponse>) {
    let partial = match payload {
        Ok(Json(partial)) => partial,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                ActionResponse::failure(rejection.body_text()),
            )
        }
    };

    let mut config = state.config.write().await;
    let mut updated = config.clone();
    if let Err(e) = updated.apply_update(&partial) {
        return (StatusCode::OK, ActionResponse::failure(e.to_string()));
    }

    match state.store.try_save(&updated) {
        Ok(()) => {
            *config = updated;
            info!("Configuration updated from web form");
            (StatusCode::OK, ActionResponse::ok("Configuration saved"))
        }
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            (
                StatusCode::OK,
                ActionResponse::failure(format!("Failed to save configuration: {}", e)),
            )
        }
    }
}

pub async fn test_token(
    State(state): State<SharedState>,
    payload: Result<Json<TokenCheck>, JsonRejection>,
) -> Json<ActionResponse> {
    let token = match payload {
        Ok(Json(check)) => check.token,
        Err(rejection) => return ActionResponse::failure(rejection.body_text()),
    };
    if token.trim().is_empty() {
        return ActionResponse::failure("No token provided");
    }

    let config = state.snapshot().await;
    // The form shows the masked value until a new token is typed
    let token = if token == REDACTED {
        config.repo_credential.clone()
    } else {
        token
    };
    let Some(client) = github_client(&config) else {
        return ActionResponse::failure("Hosted API is unreachable");
    };
    match client.get_identity(&token).await {
        Some(login) => ActionResponse::ok(format!("Token valid for user {}", login)),
        None => ActionResponse::failure("Invalid token"),
    }
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"})))
}

//! Outcome of a pipeline run

use projwiz_core::types::{AppIds, StepLog, StepRecord};
use serde::{Deserialize, Serialize};

/// What a pipeline run produced
///
/// `success` is false only for fatal failures; degraded steps are visible
/// in `steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub success: bool,
    pub project_path: Option<String>,
    pub backend_project_id: Option<String>,
    pub app_ids: Option<AppIds>,
    pub remote_repo_url: Option<String>,
    pub build_tag: Option<String>,
    /// Rendered form of `steps`
    pub step_log: Vec<String>,
    pub steps: Vec<StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineResult {
    /// A failed run with the steps recorded so far
    pub fn failed(error: impl Into<String>, log: &StepLog) -> Self {
        Self {
            success: false,
            project_path: None,
            backend_project_id: None,
            app_ids: None,
            remote_repo_url: None,
            build_tag: None,
            step_log: log.lines(),
            steps: log.records().to_vec(),
            error: Some(error.into()),
        }
    }
}

//! Project creation request

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("project name regex is valid"));

fn default_branch() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

/// Everything needed to create one project
///
/// Accepts the snake_case keys older front-ends send (`org_domain`,
/// `template_repo`, `init_git`, ...) alongside camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "org_domain")]
    pub org_domain: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, alias = "template_repo")]
    pub template_repo: String,

    #[serde(default = "default_branch", alias = "template_branch")]
    pub template_branch: String,

    /// Backend account; the configured account is used when empty
    #[serde(default, alias = "firebase_account")]
    pub backend_account: String,

    #[serde(default = "default_true", alias = "init_git")]
    pub init_version_control: bool,

    #[serde(default, alias = "setup_firebase")]
    pub setup_backend: bool,

    #[serde(default = "default_true", alias = "private")]
    pub private_repo: bool,
}

impl ProjectRequest {
    /// Request with defaults for everything but the required fields
    pub fn new(
        name: impl Into<String>,
        org_domain: impl Into<String>,
        template_repo: impl Into<String>,
        template_branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            org_domain: org_domain.into(),
            description: String::new(),
            template_repo: template_repo.into(),
            template_branch: template_branch.into(),
            backend_account: String::new(),
            init_version_control: true,
            setup_backend: false,
            private_repo: true,
        }
    }

    /// Check required fields and the project name pattern
    ///
    /// # Errors
    /// Returns [`Error::MissingFields`] naming every empty required field,
    /// [`Error::InvalidProjectName`], or [`Error::OptionLikeValue`] when the
    /// template repository or branch starts with `-`
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("orgDomain", &self.org_domain),
            ("templateRepo", &self.template_repo),
            ("templateBranch", &self.template_branch),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(Error::missing_fields(missing.join(", ")));
        }
        if !is_valid_project_name(&self.name) {
            return Err(Error::invalid_project_name(&self.name));
        }
        for (field, value) in [
            ("templateRepo", &self.template_repo),
            ("templateBranch", &self.template_branch),
        ] {
            if value.trim_start().starts_with('-') {
                return Err(Error::option_like_value(field, value.as_str()));
            }
        }
        Ok(())
    }

    /// Description used for the hosted repository
    pub fn repository_description(&self) -> String {
        if self.description.trim().is_empty() {
            format!("Firebase-enabled project: {}", self.name)
        } else {
            self.description.clone()
        }
    }
}

/// Whether `name` is lowercase letters, digits, and hyphens only
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME.is_match(name)
}

//! The persisted wizard configuration document

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Credential value shipped in sample configs; treated as "not configured"
pub const PLACEHOLDER_CREDENTIAL: &str = "your_github_personal_access_token_here";

/// Value shown in place of a configured credential
pub const REDACTED: &str = "***";

/// Credentials, template registry, and defaults for the wizard
///
/// Older config files used snake_case keys (`github_token`,
/// `firebase_account`, `default_org`); those are accepted on read and
/// rewritten in camelCase on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfig {
    /// Hosted-repository access token
    #[serde(default, alias = "github_token")]
    pub repo_credential: String,

    /// Account used by the backend provisioning CLI
    #[serde(default, alias = "firebase_account")]
    pub backend_account: String,

    /// Template name to repository URL
    #[serde(default = "default_templates")]
    pub templates: BTreeMap<String, String>,

    /// Organization offered by default in the wizard
    #[serde(default = "default_org", alias = "default_org")]
    pub default_org: String,

    /// Directory finished projects are placed in
    #[serde(default = "default_projects_dir", alias = "projects_dir")]
    pub projects_dir: String,

    /// Base URL of the hosted-repository REST API
    #[serde(default = "default_hosted_api_url", alias = "hosted_api_url")]
    pub hosted_api_url: String,

    /// Backend provisioning CLI executable
    #[serde(default = "default_backend_cli", alias = "backend_cli")]
    pub backend_cli: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            repo_credential: String::new(),
            backend_account: String::new(),
            templates: default_templates(),
            default_org: default_org(),
            projects_dir: default_projects_dir(),
            hosted_api_url: default_hosted_api_url(),
            backend_cli: default_backend_cli(),
        }
    }
}

fn default_templates() -> BTreeMap<String, String> {
    [
        ("react-native", "https://github.com/your-org/react-native-template"),
        ("nextjs", "https://github.com/your-org/nextjs-template"),
        ("flutter", "https://github.com/your-org/flutter-template"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_org() -> String {
    "your-org".to_string()
}

fn default_projects_dir() -> String {
    "projects".to_string()
}

fn default_hosted_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_backend_cli() -> String {
    "firebase".to_string()
}

/// Map any accepted key spelling to its canonical camelCase form
fn canonical_key(key: &str) -> Option<&'static str> {
    match key {
        "repoCredential" | "github_token" | "repo-credential" | "repo_credential" => {
            Some("repoCredential")
        }
        "backendAccount" | "firebase_account" | "backend-account" | "backend_account" => {
            Some("backendAccount")
        }
        "templates" => Some("templates"),
        "defaultOrg" | "default_org" | "default-org" => Some("defaultOrg"),
        "projectsDir" | "projects_dir" | "projects-dir" => Some("projectsDir"),
        "hostedApiUrl" | "hosted_api_url" | "hosted-api-url" => Some("hostedApiUrl"),
        "backendCli" | "backend_cli" | "backend-cli" => Some("backendCli"),
        _ => None,
    }
}

impl WizardConfig {
    /// Whether a usable hosted-repository credential is configured
    pub fn has_repo_credential(&self) -> bool {
        credential_is_configured(&self.repo_credential)
    }

    /// Whether a backend account is configured
    pub fn has_backend_account(&self) -> bool {
        !self.backend_account.trim().is_empty()
    }

    /// View safe to hand to a browser or print to a terminal
    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            repo_credential: if self.repo_credential.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            },
            backend_account: self.backend_account.clone(),
            templates: self.templates.clone(),
            default_org: self.default_org.clone(),
            projects_dir: self.projects_dir.clone(),
            hosted_api_url: self.hosted_api_url.clone(),
        }
    }

    /// Build a config from a parsed config file
    ///
    /// Key spellings are normalized before deserializing, so a file that
    /// carries both the legacy and the camelCase spelling of a key loads
    /// with the camelCase value. Unknown keys are dropped.
    pub fn from_document(document: Value) -> Result<Self> {
        let Value::Object(entries) = document else {
            return Err(Error::invalid_config("config file must contain a JSON object"));
        };

        let mut normalized = Map::new();
        for (key, value) in entries {
            let Some(canonical) = canonical_key(&key) else {
                debug!("Ignoring unknown config key: {}", key);
                continue;
            };
            if key != canonical && normalized.contains_key(canonical) {
                continue;
            }
            normalized.insert(canonical.to_string(), value);
        }

        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| Error::invalid_config(e.to_string()))
    }

    /// Merge a partial JSON document into this config
    ///
    /// Keys may use either the camelCase or legacy snake_case spelling.
    /// Unknown keys are ignored, as is a redacted credential echoed back
    /// by a client. Returns an error when a known key has the wrong shape,
    /// leaving `self` unchanged.
    pub fn apply_update(&mut self, partial: &Value) -> Result<()> {
        let updates = partial
            .as_object()
            .ok_or_else(|| Error::invalid_config("config update must be a JSON object"))?;

        let mut merged = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (key, value) in updates {
            let Some(canonical) = canonical_key(key) else {
                debug!("Ignoring unknown config key: {}", key);
                continue;
            };
            if canonical == "repoCredential" && value.as_str() == Some(REDACTED) {
                continue;
            }
            merged.insert(canonical.to_string(), value.clone());
        }

        *self = serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        Ok(())
    }

    /// Set a single string-valued key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match canonical_key(key) {
            Some("templates") | None => Err(Error::unknown_config_key(key)),
            Some(canonical) => {
                let mut update = Map::new();
                update.insert(canonical.to_string(), Value::String(value.to_string()));
                self.apply_update(&Value::Object(update))
            }
        }
    }

    /// Register or replace a template
    pub fn add_template(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.templates.insert(name.into(), url.into());
    }

    /// Remove a template, returning its URL if it was registered
    pub fn remove_template(&mut self, name: &str) -> Option<String> {
        self.templates.remove(name)
    }
}

/// Whether a credential string is set to something other than the sample placeholder
pub fn credential_is_configured(credential: &str) -> bool {
    let trimmed = credential.trim();
    !trimmed.is_empty() && trimmed != PLACEHOLDER_CREDENTIAL
}

/// Configuration with the hosted-repository credential masked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedConfig {
    pub repo_credential: String,
    pub backend_account: String,
    pub templates: BTreeMap<String, String>,
    pub default_org: String,
    pub projects_dir: String,
    pub hosted_api_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_document() {
        let config = WizardConfig::default();
        assert!(config.repo_credential.is_empty());
        assert_eq!(config.default_org, "your-org");
        assert_eq!(config.templates.len(), 3);
        assert_eq!(
            config.templates.get("flutter").map(String::as_str),
            Some("https://github.com/your-org/flutter-template")
        );
        assert_eq!(config.projects_dir, "projects");
    }

    #[test]
    fn test_legacy_keys_accepted() {
        let config: WizardConfig = serde_json::from_value(json!({
            "github_token": "ghp_abc",
            "firebase_account": "dev@example.com",
            "default_org": "acme",
            "templates": {"flutter": "https://example.com/flutter"}
        }))
        .unwrap();

        assert_eq!(config.repo_credential, "ghp_abc");
        assert_eq!(config.backend_account, "dev@example.com");
        assert_eq!(config.default_org, "acme");
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.hosted_api_url, "https://api.github.com");
    }

    #[test]
    fn test_placeholder_credential_is_not_configured() {
        let mut config = WizardConfig::default();
        assert!(!config.has_repo_credential());

        config.repo_credential = PLACEHOLDER_CREDENTIAL.to_string();
        assert!(!config.has_repo_credential());

        config.repo_credential = "ghp_real".to_string();
        assert!(config.has_repo_credential());
    }

    #[test]
    fn test_redacted_masks_credential() {
        let mut config = WizardConfig::default();
        assert_eq!(config.redacted().repo_credential, "");

        config.repo_credential = "ghp_secret".to_string();
        let redacted = config.redacted();
        assert_eq!(redacted.repo_credential, "***");

        let rendered = serde_json::to_string(&redacted).unwrap();
        assert!(!rendered.contains("ghp_secret"));
    }

    #[test]
    fn test_apply_update_merges_known_keys() {
        let mut config = WizardConfig::default();
        config
            .apply_update(&json!({
                "github_token": "ghp_new",
                "defaultOrg": "acme",
                "unrelated": 42
            }))
            .unwrap();

        assert_eq!(config.repo_credential, "ghp_new");
        assert_eq!(config.default_org, "acme");
        assert_eq!(config.templates.len(), 3);
    }

    #[test]
    fn test_apply_update_ignores_redacted_echo() {
        let mut config = WizardConfig {
            repo_credential: "ghp_keep".to_string(),
            ..Default::default()
        };
        config
            .apply_update(&json!({"repoCredential": "***", "backendAccount": "a@b.c"}))
            .unwrap();

        assert_eq!(config.repo_credential, "ghp_keep");
        assert_eq!(config.backend_account, "a@b.c");
    }

    #[test]
    fn test_apply_update_rejects_bad_shape() {
        let mut config = WizardConfig::default();
        let before = config.clone();

        assert!(config.apply_update(&json!({"templates": "nope"})).is_err());
        assert!(config.apply_update(&json!(["not", "an", "object"])).is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn test_set_value() {
        let mut config = WizardConfig::default();
        config.set_value("default-org", "acme").unwrap();
        assert_eq!(config.default_org, "acme");

        assert!(matches!(
            config.set_value("colour", "blue"),
            Err(Error::UnknownConfigKey { .. })
        ));
        assert!(config.set_value("templates", "x").is_err());
    }

    #[test]
    fn test_template_registry_edits() {
        let mut config = WizardConfig::default();
        config.add_template("svelte", "https://example.com/svelte");
        assert_eq!(config.templates.len(), 4);

        assert_eq!(
            config.remove_template("svelte").as_deref(),
            Some("https://example.com/svelte")
        );
        assert!(config.remove_template("svelte").is_none());
    }
}

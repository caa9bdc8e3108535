//! Consolidated app config merge
//!
//! Provisioned credentials are merged into `assets/config/app_config.json`
//! without disturbing what the template already put there: existing keys
//! are updated in place, top-level sections are only added when missing,
//! and nothing is removed. A TypeScript description of the merged document
//! is written alongside in `lib/app_config.ts`.

use crate::error::Result;
use crate::sdk_config::{fallback_credentials, BackendCredentials, CredentialSet};
use camino::{Utf8Path, Utf8PathBuf};
use projwiz_core::types::{AppIds, Platform};
use serde_json::{Map, Value};
use std::fs;
use tracing::{info, warn};

/// Location of the consolidated config, relative to the project root
pub const CONSOLIDATED_CONFIG_PATH: &str = "assets/config/app_config.json";

/// Location of the generated type description, relative to the project root
pub const TYPE_DEFINITIONS_PATH: &str = "lib/app_config.ts";

/// Order platforms appear in the `firebase` section
const SECTION_ORDER: [Platform; 3] = [Platform::Web, Platform::Android, Platform::Ios];

/// Everything needed to merge one provisioning run
#[derive(Debug, Clone)]
pub struct MergeInput<'a> {
    pub project_id: &'a str,
    pub project_name: &'a str,
    pub org_domain: &'a str,
    pub app_ids: &'a AppIds,
    pub credentials: &'a BackendCredentials,
}

impl MergeInput<'_> {
    fn bundle_id(&self) -> String {
        format!("com.{}.{}", self.org_domain, self.project_name)
    }

    fn app_description(&self) -> String {
        format!("Firebase-enabled {} application", self.project_name)
    }

    /// Credential sets per platform, or fallbacks when none were downloaded
    fn firebase_section(&self) -> Map<String, Value> {
        let fallback;
        let credentials = if self.credentials.is_empty() {
            fallback = fallback_credentials(self.project_id, self.app_ids, &self.bundle_id());
            &fallback
        } else {
            self.credentials
        };

        SECTION_ORDER
            .iter()
            .filter_map(|platform| {
                credentials
                    .get(*platform)
                    .map(|set| (platform.as_str().to_string(), Value::Object(set.clone())))
            })
            .collect()
    }
}

/// What a merge did to the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub config_path: Utf8PathBuf,
    pub type_definitions_path: Utf8PathBuf,
    /// The consolidated config did not exist before
    pub created: bool,
    /// The consolidated config content changed
    pub changed: bool,
}

/// Merge provisioning results into a config document in place
///
/// Non-object documents are replaced by an empty object first.
pub fn merge_document(doc: &mut Value, input: &MergeInput<'_>) {
    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    let Some(root) = doc.as_object_mut() else {
        return;
    };

    merge_app_section(root, input);
    merge_firebase_section(root, input);

    if !root.contains_key("project") {
        let mut project = Map::new();
        project.insert("name".into(), input.project_name.into());
        project.insert(
            "description".into(),
            format!("Firebase-enabled project: {}", input.project_name).into(),
        );
        project.insert("org_domain".into(), input.org_domain.into());
        project.insert(
            "created_at".into(),
            chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .into(),
        );
        root.insert("project".into(), Value::Object(project));
    }
}

fn merge_app_section(root: &mut Map<String, Value>, input: &MergeInput<'_>) {
    if let Some(existing) = root.get_mut("app") {
        let Some(app) = existing.as_object_mut() else {
            warn!("Consolidated config 'app' is not an object; leaving it untouched");
            return;
        };
        if app.contains_key("name") {
            app.insert("name".into(), input.project_name.into());
        }
        if app.contains_key("description") {
            app.insert("description".into(), input.app_description().into());
        }
    } else {
        let mut app = Map::new();
        app.insert("name".into(), input.project_name.into());
        app.insert("description".into(), input.app_description().into());
        app.insert("version".into(), "1.0.0".into());
        app.insert("buildNumber".into(), "1".into());
        root.insert("app".into(), Value::Object(app));
    }
}

fn merge_firebase_section(root: &mut Map<String, Value>, input: &MergeInput<'_>) {
    let incoming = input.firebase_section();

    if !root.contains_key("firebase") {
        root.insert("firebase".into(), Value::Object(incoming));
        return;
    }
    let Some(existing) = root.get_mut("firebase").and_then(Value::as_object_mut) else {
        warn!("Consolidated config 'firebase' is not an object; leaving it untouched");
        return;
    };

    for (platform, values) in incoming {
        let Value::Object(values) = values else {
            continue;
        };
        if let Some(current) = existing.get_mut(&platform) {
            if let Some(current) = current.as_object_mut() {
                update_existing_keys(current, &values);
            }
        } else {
            existing.insert(platform, Value::Object(values));
        }
    }
}

fn update_existing_keys(current: &mut Map<String, Value>, incoming: &CredentialSet) {
    for (key, value) in incoming {
        if let Some(slot) = current.get_mut(key) {
            *slot = value.clone();
        }
    }
}

/// Merge provisioning results into the project's consolidated config and
/// regenerate its type description
///
/// A missing config is created; one that is not valid JSON is rebuilt
/// from an empty document.
pub fn merge_backend_config(project_dir: &Utf8Path, input: &MergeInput<'_>) -> Result<MergeOutcome> {
    let config_path = project_dir.join(CONSOLIDATED_CONFIG_PATH);
    let existing = if config_path.exists() {
        Some(fs::read_to_string(&config_path)?)
    } else {
        None
    };

    let mut doc = match existing.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(doc)) => doc,
        Some(Err(e)) => {
            warn!("{} is not valid JSON ({}); rebuilding it", config_path, e);
            Value::Object(Map::new())
        }
        None => Value::Object(Map::new()),
    };

    merge_document(&mut doc, input);

    let rendered = serde_json::to_string_pretty(&doc)? + "\n";
    let changed = existing.as_deref() != Some(rendered.as_str());
    if changed {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, &rendered)?;
        info!("Updated {}", config_path);
    }

    let type_definitions_path = write_type_definitions(project_dir, &doc)?;

    Ok(MergeOutcome {
        config_path,
        type_definitions_path,
        created: existing.is_none(),
        changed,
    })
}

/// Write `lib/app_config.ts` describing `doc`
pub fn write_type_definitions(project_dir: &Utf8Path, doc: &Value) -> Result<Utf8PathBuf> {
    let path = project_dir.join(TYPE_DEFINITIONS_PATH);
    let content = render_type_definitions(doc)?;

    if fs::read_to_string(&path).ok().as_deref() != Some(content.as_str()) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
    }
    Ok(path)
}

/// TypeScript source with an interface for `doc` and a typed constant holding it
pub fn render_type_definitions(doc: &Value) -> Result<String> {
    let mut out = String::from("// Generated by projwiz. Regenerated on every backend setup.\n\n");
    out.push_str("export interface FirebaseAppConfig ");
    out.push_str(&ts_type(doc, 0));
    out.push_str("\n\nexport const appConfig: FirebaseAppConfig = ");
    out.push_str(&serde_json::to_string_pretty(doc)?);
    out.push_str(";\n");
    Ok(out)
}

fn ts_type(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => match items.first() {
            Some(first) => format!("{}[]", ts_type(first, depth)),
            None => "unknown[]".to_string(),
        },
        Value::Object(map) => {
            if map.is_empty() {
                return "Record<string, never>".to_string();
            }
            let indent = "  ".repeat(depth + 1);
            let mut out = String::from("{\n");
            for (key, child) in map {
                out.push_str(&indent);
                out.push_str(&ts_key(key));
                out.push_str(": ");
                out.push_str(&ts_type(child, depth + 1));
                out.push_str(";\n");
            }
            out.push_str(&"  ".repeat(depth));
            out.push('}');
            out
        }
    }
}

fn ts_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        format!("{:?}", key)
    }
}

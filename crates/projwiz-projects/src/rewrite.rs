//! Template identifier rewriting
//!
//! Templates ship with placeholder identifiers (`mytemplate-app` and the
//! bundle id `com.meghzone.mytemplate-app`) in a fixed set of files. The
//! [`IdentifierRewriter`] trait is the seam for replacing the literal
//! substring strategy with a token-aware one.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::fs;
use tracing::{debug, info, warn};

/// Placeholder project slug used throughout templates
pub const PLACEHOLDER_NAME: &str = "mytemplate-app";

/// Placeholder bundle identifier used throughout templates
pub const PLACEHOLDER_BUNDLE_ID: &str = "com.meghzone.mytemplate-app";

/// Template files checked for placeholder identifiers
pub const REWRITE_MANIFEST: [&str; 11] = [
    "pubspec.yaml",
    "android/app/build.gradle",
    "ios/Runner.xcodeproj/project.pbxproj",
    "ios/Runner/Info.plist",
    "web/index.html",
    "README.md",
    "firebase.json",
    "firestore.rules",
    "storage.rules",
    "assets/config/app_config.json",
    "assets/config/app_config_sample.json",
];

/// Identity a template is rewritten to
#[derive(Debug, Clone, Copy)]
pub struct ProjectIdentity<'a> {
    pub name: &'a str,
    pub org_domain: &'a str,
    pub description: &'a str,
}

impl ProjectIdentity<'_> {
    pub fn bundle_id(&self) -> String {
        format!("com.{}.{}", self.org_domain, self.name)
    }
}

/// Files changed by a rewrite and the problems met along the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub rewritten: Vec<Utf8PathBuf>,
    pub warnings: Vec<String>,
}

impl RewriteReport {
    pub fn merge(&mut self, other: RewriteReport) {
        self.rewritten.extend(other.rewritten);
        self.warnings.extend(other.warnings);
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{} file(s) rewritten", self.rewritten.len());
        if !self.warnings.is_empty() {
            summary.push_str(&format!("; {}", self.warnings.join("; ")));
        }
        summary
    }
}

/// Rewrites template identifiers in a cloned project
pub trait IdentifierRewriter: Send + Sync {
    /// Rewrite `project_dir` in place; never fails, problems become warnings
    fn rewrite(&self, project_dir: &Utf8Path, identity: &ProjectIdentity<'_>) -> RewriteReport;
}

/// Literal substring replacement over a fixed file manifest
///
/// The bundle id is replaced before the bare slug, since the slug is a
/// substring of the bundle id.
#[derive(Debug, Clone)]
pub struct SubstringRewriter {
    manifest: Vec<String>,
    placeholder_name: String,
    placeholder_bundle_id: String,
}

impl Default for SubstringRewriter {
    fn default() -> Self {
        Self {
            manifest: REWRITE_MANIFEST.iter().map(|s| s.to_string()).collect(),
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            placeholder_bundle_id: PLACEHOLDER_BUNDLE_ID.to_string(),
        }
    }
}

impl SubstringRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewriter over a custom manifest of project-relative paths
    pub fn with_manifest<I, S>(manifest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manifest: manifest.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Replace placeholders in `content`
    pub fn replace(&self, content: &str, identity: &ProjectIdentity<'_>) -> String {
        content
            .replace(&self.placeholder_bundle_id, &identity.bundle_id())
            .replace(&self.placeholder_name, identity.name)
    }

    fn rewrite_file(&self, path: &Utf8Path, identity: &ProjectIdentity<'_>) -> Result<bool> {
        let content = fs::read_to_string(path)?;
        let updated = self.replace(&content, identity);
        if updated == content {
            return Ok(false);
        }
        fs::write(path, updated)?;
        Ok(true)
    }
}

impl IdentifierRewriter for SubstringRewriter {
    fn rewrite(&self, project_dir: &Utf8Path, identity: &ProjectIdentity<'_>) -> RewriteReport {
        let mut report = RewriteReport::default();

        for relative in &self.manifest {
            let path = project_dir.join(relative);
            if !path.is_file() {
                continue;
            }
            match self.rewrite_file(&path, identity) {
                Ok(true) => {
                    debug!("Rewrote identifiers in {}", relative);
                    report.rewritten.push(path);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Could not update {}: {}", relative, e);
                    report.warnings.push(format!("could not update {}: {}", relative, e));
                }
            }
        }

        info!("Rewrote identifiers in {} file(s)", report.rewritten.len());
        report
    }
}

/// Set project metadata in `package.json` and Expo's `app.json`
///
/// `package.json` gets `name` and `description` (defaulting to
/// `"{name} project"`); `app.json` gets `expo.name` and `expo.slug` when it
/// has an `expo` object. Missing files are skipped; unreadable ones become
/// warnings.
pub fn update_package_manifest(project_dir: &Utf8Path, identity: &ProjectIdentity<'_>) -> RewriteReport {
    let mut report = RewriteReport::default();
    let description = if identity.description.trim().is_empty() {
        format!("{} project", identity.name)
    } else {
        identity.description.to_string()
    };

    let edits: [(&str, Box<dyn Fn(&mut Value) -> bool + '_>); 2] = [
        (
            "package.json",
            Box::new(|doc: &mut Value| {
                let Some(obj) = doc.as_object_mut() else {
                    return false;
                };
                obj.insert("name".to_string(), Value::String(identity.name.to_string()));
                obj.insert("description".to_string(), Value::String(description.clone()));
                true
            }),
        ),
        (
            "app.json",
            Box::new(|doc: &mut Value| {
                let Some(expo) = doc.get_mut("expo").and_then(Value::as_object_mut) else {
                    return false;
                };
                expo.insert("name".to_string(), Value::String(identity.name.to_string()));
                expo.insert("slug".to_string(), Value::String(identity.name.to_string()));
                true
            }),
        ),
    ];

    for (relative, edit) in edits.iter() {
        let path = project_dir.join(relative);
        if !path.is_file() {
            continue;
        }
        match edit_json(&path, edit.as_ref()) {
            Ok(true) => report.rewritten.push(path),
            Ok(false) => {}
            Err(e) => {
                warn!("Could not update {}: {}", relative, e);
                report.warnings.push(format!("could not update {}: {}", relative, e));
            }
        }
    }

    report
}

fn edit_json(path: &Utf8Path, edit: &dyn Fn(&mut Value) -> bool) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let mut doc: Value = serde_json::from_str(&content)?;
    if !edit(&mut doc) {
        return Ok(false);
    }
    let updated = serde_json::to_string_pretty(&doc)? + "\n";
    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const IDENTITY: ProjectIdentity<'static> = ProjectIdentity {
        name: "demo-app",
        org_domain: "acme",
        description: "",
    };

    fn project() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_bundle_id_replaced_before_slug() {
        let rewriter = SubstringRewriter::new();
        let out = rewriter.replace(
            "applicationId \"com.meghzone.mytemplate-app\"\nname: mytemplate-app",
            &IDENTITY,
        );
        assert_eq!(out, "applicationId \"com.acme.demo-app\"\nname: demo-app");
    }

    #[test]
    fn test_rewrites_manifest_files_only() {
        let (_guard, root) = project();
        fs::create_dir_all(root.join("android/app")).unwrap();
        fs::write(root.join("pubspec.yaml"), "name: mytemplate-app\n").unwrap();
        fs::write(
            root.join("android/app/build.gradle"),
            "applicationId \"com.meghzone.mytemplate-app\"\n",
        )
        .unwrap();
        fs::write(root.join("notes.txt"), "mytemplate-app\n").unwrap();
        fs::write(root.join("README.md"), "no placeholders here\n").unwrap();

        let report = SubstringRewriter::new().rewrite(&root, &IDENTITY);

        assert_eq!(report.rewritten.len(), 2);
        assert!(report.warnings.is_empty());
        assert_eq!(fs::read_to_string(root.join("pubspec.yaml")).unwrap(), "name: demo-app\n");
        assert_eq!(
            fs::read_to_string(root.join("android/app/build.gradle")).unwrap(),
            "applicationId \"com.acme.demo-app\"\n"
        );
        assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), "mytemplate-app\n");
    }

    #[test]
    fn test_unreadable_file_becomes_warning() {
        let (_guard, root) = project();
        fs::write(root.join("README.md"), b"\xff\xfe\x00").unwrap();

        let report = SubstringRewriter::new().rewrite(&root, &IDENTITY);
        assert!(report.rewritten.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("README.md"));
    }

    #[test]
    fn test_custom_manifest() {
        let (_guard, root) = project();
        fs::write(root.join("Cargo.toml"), "name = \"mytemplate-app\"\n").unwrap();

        let report = SubstringRewriter::with_manifest(["Cargo.toml"]).rewrite(&root, &IDENTITY);
        assert_eq!(report.rewritten, vec![root.join("Cargo.toml")]);
    }

    #[test]
    fn test_package_manifest_update() {
        let (_guard, root) = project();
        fs::write(
            root.join("package.json"),
            r#"{"name": "template", "version": "1.0.0", "description": "x"}"#,
        )
        .unwrap();
        fs::write(root.join("app.json"), r#"{"expo": {"name": "T", "slug": "t", "version": "1"}}"#)
            .unwrap();

        let report = update_package_manifest(&root, &IDENTITY);
        assert_eq!(report.rewritten.len(), 2);

        let package: Value =
            serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
        assert_eq!(package["name"], "demo-app");
        assert_eq!(package["description"], "demo-app project");
        let keys: Vec<&String> = package.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "version", "description"]);

        let app: Value =
            serde_json::from_str(&fs::read_to_string(root.join("app.json")).unwrap()).unwrap();
        assert_eq!(app["expo"]["slug"], "demo-app");
        assert_eq!(app["expo"]["version"], "1");
    }

    #[test]
    fn test_package_manifest_warns_on_invalid_json() {
        let (_guard, root) = project();
        fs::write(root.join("package.json"), "{ not json").unwrap();

        let report = update_package_manifest(&root, &IDENTITY);
        assert!(report.rewritten.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }
}

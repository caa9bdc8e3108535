//! Backend scaffold files written into a project

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::fs;
use tracing::{debug, info};

/// Security rules granting authenticated users access to every document
pub const FIRESTORE_RULES: &str = "rules_version = '2';
service cloud.firestore {
  match /databases/{database}/documents {
    match /{document=**} {
      allow read, write: if request.auth != null;
    }
  }
}
";

/// Security rules granting authenticated users access to every object
pub const STORAGE_RULES: &str = "rules_version = '2';
service firebase.storage {
  match /b/{bucket}/o {
    match /{allPaths=**} {
      allow read, write: if request.auth != null;
    }
  }
}
";

/// Write `content` to `project_dir/relative` unless the file already exists
///
/// Returns whether the file was created.
pub fn write_if_absent(project_dir: &Utf8Path, relative: &str, content: &str) -> Result<bool> {
    let path = project_dir.join(relative);
    if path.exists() {
        debug!("Keeping existing {}", path);
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(true)
}

/// Create `firebase.json`, `firestore.indexes.json`, `firestore.rules`,
/// and `storage.rules` where missing
///
/// Returns the files that were created.
pub fn ensure_backend_files(project_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let firebase_json = json!({
        "firestore": {
            "rules": "firestore.rules",
            "indexes": "firestore.indexes.json"
        },
        "storage": {
            "rules": "storage.rules"
        },
        "hosting": {
            "public": "public",
            "ignore": ["firebase.json", "**/.*", "**/node_modules/**"]
        }
    });
    let indexes = json!({ "indexes": [], "fieldOverrides": [] });

    let files = [
        ("firebase.json", serde_json::to_string_pretty(&firebase_json)? + "\n"),
        ("firestore.indexes.json", serde_json::to_string_pretty(&indexes)? + "\n"),
        ("firestore.rules", FIRESTORE_RULES.to_string()),
        ("storage.rules", STORAGE_RULES.to_string()),
    ];

    let mut created = Vec::new();
    for (relative, content) in files {
        if write_if_absent(project_dir, relative, &content)? {
            created.push(project_dir.join(relative));
        }
    }

    if !created.is_empty() {
        info!("Created {} backend scaffold file(s)", created.len());
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_creates_all_files_in_empty_project() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);

        let created = ensure_backend_files(&root).unwrap();
        assert_eq!(created.len(), 4);

        let firebase: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("firebase.json")).unwrap())
                .unwrap();
        assert_eq!(firebase["firestore"]["rules"], "firestore.rules");
        assert!(fs::read_to_string(root.join("storage.rules"))
            .unwrap()
            .contains("firebase.storage"));
    }

    #[test]
    fn test_existing_files_are_kept() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);
        fs::write(root.join("firestore.rules"), "custom").unwrap();

        let created = ensure_backend_files(&root).unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(fs::read_to_string(root.join("firestore.rules")).unwrap(), "custom");

        assert!(ensure_backend_files(&root).unwrap().is_empty());
    }
}

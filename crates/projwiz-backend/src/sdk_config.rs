//! Per-platform SDK config parsing
//!
//! Turns the files downloaded with `apps:sdkconfig` into the credential
//! sets stored in the consolidated app config, and builds the fallback
//! sets used when nothing could be downloaded.

use projwiz_core::types::{AppIds, Platform};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Credential key/value pairs for one platform
pub type CredentialSet = Map<String, Value>;

static PLIST_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<key>([A-Z_]+)</key>\s*<string>([^<]+)</string>")
        .expect("plist entry regex is valid")
});

const WEB_KEYS: [&str; 7] = [
    "apiKey",
    "authDomain",
    "projectId",
    "storageBucket",
    "messagingSenderId",
    "appId",
    "measurementId",
];

static WEB_FIELDS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    WEB_KEYS
        .iter()
        .map(|key| {
            let re = Regex::new(&format!(r#""?{}"?\s*:\s*"([^"]+)""#, key))
                .expect("web config field regex is valid");
            (*key, re)
        })
        .collect()
});

/// Storage bucket name for a backend project
pub fn storage_bucket(project_id: &str) -> String {
    format!("{}.firebasestorage.app", project_id)
}

/// Credentials found in a downloaded SDK config, per platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendCredentials {
    pub ios: Option<CredentialSet>,
    pub android: Option<CredentialSet>,
    pub web: Option<CredentialSet>,
}

impl BackendCredentials {
    pub fn get(&self, platform: Platform) -> Option<&CredentialSet> {
        match platform {
            Platform::Ios => self.ios.as_ref(),
            Platform::Android => self.android.as_ref(),
            Platform::Web => self.web.as_ref(),
        }
    }

    pub fn set(&mut self, platform: Platform, credentials: CredentialSet) {
        match platform {
            Platform::Ios => self.ios = Some(credentials),
            Platform::Android => self.android = Some(credentials),
            Platform::Web => self.web = Some(credentials),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ios.is_none() && self.android.is_none() && self.web.is_none()
    }
}

fn insert(set: &mut CredentialSet, key: &str, value: impl Into<String>) {
    set.insert(key.to_string(), Value::String(value.into()));
}

/// Parse a downloaded SDK config for `platform`
///
/// Returns `None` when the content yields no API key. Every returned set
/// carries `projectId` and `storageBucket`; iOS also carries `iosBundleId`.
pub fn parse_sdk_config(
    platform: Platform,
    content: &str,
    project_id: &str,
    bundle_id: &str,
) -> Option<CredentialSet> {
    let mut set = match platform {
        Platform::Ios => parse_ios_plist(content)?,
        Platform::Android => parse_android_json(content)?,
        Platform::Web => parse_web_config(content)?,
    };

    set.entry("projectId")
        .or_insert_with(|| Value::String(project_id.to_string()));
    set.entry("storageBucket")
        .or_insert_with(|| Value::String(storage_bucket(project_id)));
    if platform == Platform::Ios {
        insert(&mut set, "iosBundleId", bundle_id);
    }
    Some(set)
}

fn parse_ios_plist(content: &str) -> Option<CredentialSet> {
    let mut set = CredentialSet::new();
    for caps in PLIST_ENTRY.captures_iter(content) {
        let value = caps[2].trim();
        match &caps[1] {
            "API_KEY" => insert(&mut set, "apiKey", value),
            "GCM_SENDER_ID" => insert(&mut set, "messagingSenderId", value),
            "GOOGLE_APP_ID" => insert(&mut set, "appId", value),
            _ => {}
        }
    }
    set.contains_key("apiKey").then_some(set)
}

fn parse_android_json(content: &str) -> Option<CredentialSet> {
    let doc: Value = serde_json::from_str(content.trim()).ok()?;
    let mut set = CredentialSet::new();

    let project_info = &doc["project_info"];
    if let Some(key) = project_info["api_key"].as_str() {
        insert(&mut set, "apiKey", key);
    }
    if let Some(number) = project_info["project_number"].as_str() {
        insert(&mut set, "messagingSenderId", number);
    }
    if let Some(app_id) = doc["client"][0]["client_info"]["mobilesdk_app_id"].as_str() {
        insert(&mut set, "appId", app_id);
    }
    if let Some(key) = doc["client"][0]["api_key"][0]["current_key"].as_str() {
        set.entry("apiKey")
            .or_insert_with(|| Value::String(key.to_string()));
    }

    set.contains_key("apiKey").then_some(set)
}

fn parse_web_config(content: &str) -> Option<CredentialSet> {
    let mut set = CredentialSet::new();
    for (key, re) in WEB_FIELDS.iter() {
        if let Some(caps) = re.captures(content) {
            insert(&mut set, key, &caps[1]);
        }
    }
    set.contains_key("apiKey").then_some(set)
}

/// Deterministic placeholder credentials derived from the project id
///
/// Used when no SDK config could be downloaded so the consolidated config
/// still has the expected shape.
pub fn fallback_credentials(project_id: &str, app_ids: &AppIds, bundle_id: &str) -> BackendCredentials {
    let prefix: String = project_id.chars().take(8).collect::<String>().to_uppercase();
    let sender_id = match project_id.rsplit_once('-') {
        Some((_, last)) => last.to_string(),
        None => "123456789".to_string(),
    };

    let base = |platform: Platform| {
        let mut set = CredentialSet::new();
        insert(&mut set, "apiKey", format!("AIzaSy{}", prefix));
        insert(&mut set, "appId", app_ids.get(platform));
        insert(&mut set, "messagingSenderId", sender_id.clone());
        insert(&mut set, "projectId", project_id);
        set
    };

    let mut web = base(Platform::Web);
    insert(&mut web, "authDomain", format!("{}.firebaseapp.com", project_id));
    insert(&mut web, "storageBucket", storage_bucket(project_id));
    insert(&mut web, "measurementId", format!("G-{}", prefix));

    let mut android = base(Platform::Android);
    insert(&mut android, "storageBucket", storage_bucket(project_id));

    let mut ios = base(Platform::Ios);
    insert(&mut ios, "storageBucket", storage_bucket(project_id));
    insert(&mut ios, "iosBundleId", bundle_id);

    BackendCredentials {
        ios: Some(ios),
        android: Some(android),
        web: Some(web),
    }
}

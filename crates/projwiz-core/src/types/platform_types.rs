//! Backend platform and app identifier types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel for an identifier that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Client platform a backend app is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    /// All platforms in provisioning order
    pub const ALL: [Platform; 3] = [Platform::Ios, Platform::Android, Platform::Web];

    /// Lowercase name used on the backend command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }

    /// Location of the downloaded SDK config file, relative to the project root
    pub fn sdk_config_path(&self) -> &'static str {
        match self {
            Platform::Ios => "ios/Runner/GoogleService-Info.plist",
            Platform::Android => "android/app/google-services.json",
            Platform::Web => "web/firebase-config.js",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "web" => Ok(Platform::Web),
            other => Err(Error::invalid_platform(other)),
        }
    }
}

/// Backend app identifiers, one per platform
///
/// Always fully populated: a platform whose app could not be created or
/// whose identifier could not be extracted holds [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIds {
    pub ios: String,
    pub android: String,
    pub web: String,
}

impl Default for AppIds {
    fn default() -> Self {
        Self {
            ios: UNKNOWN.to_string(),
            android: UNKNOWN.to_string(),
            web: UNKNOWN.to_string(),
        }
    }
}

impl AppIds {
    /// Identifier for a platform
    pub fn get(&self, platform: Platform) -> &str {
        match platform {
            Platform::Ios => &self.ios,
            Platform::Android => &self.android,
            Platform::Web => &self.web,
        }
    }

    /// Set the identifier for a platform
    pub fn set(&mut self, platform: Platform, id: impl Into<String>) {
        let id = id.into();
        match platform {
            Platform::Ios => self.ios = id,
            Platform::Android => self.android = id,
            Platform::Web => self.web = id,
        }
    }

    /// Whether the platform has a usable identifier
    pub fn is_known(&self, platform: Platform) -> bool {
        self.get(platform) != UNKNOWN
    }

    /// Platforms with a usable identifier, in provisioning order
    pub fn known_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.is_known(*p))
            .collect()
    }
}

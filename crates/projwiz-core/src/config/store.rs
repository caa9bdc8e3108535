//! Config file loading and saving

use super::WizardConfig;
use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::{debug, info, warn};

/// Default config file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Reads and writes the wizard configuration document
///
/// Both directions fail soft: a missing or unreadable file loads as the
/// default document, and a failed save is logged and reported as `false`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Utf8PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load the config, falling back to defaults on any error
    pub fn load(&self) -> WizardConfig {
        if !self.path.exists() {
            debug!("Config file {} not found, using defaults", self.path);
            return WizardConfig::default();
        }

        match self.try_load() {
            Ok(config) => {
                debug!("Loaded config from {}", self.path);
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}. Using defaults", self.path, e);
                WizardConfig::default()
            }
        }
    }

    /// Load the config, propagating read and parse errors
    pub fn try_load(&self) -> Result<WizardConfig> {
        let content = fs::read_to_string(&self.path)?;
        let document = serde_json::from_str(&content)?;
        WizardConfig::from_document(document)
    }

    /// Save the whole document; returns whether the write succeeded
    pub fn save(&self, config: &WizardConfig) -> bool {
        match self.try_save(config) {
            Ok(()) => {
                info!("Saved config to {}", self.path);
                true
            }
            Err(e) => {
                warn!("Failed to save config to {}: {}", self.path, e);
                false
            }
        }
    }

    /// Save the whole document, propagating errors
    ///
    /// Writes to a sibling temp file first, then renames it over the target.
    pub fn try_save(&self, config: &WizardConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

//! Wizard configuration loading and persistence

mod store;
mod wizard_config;

pub use store::ConfigStore;
pub use wizard_config::{
    credential_is_configured, RedactedConfig, WizardConfig, PLACEHOLDER_CREDENTIAL, REDACTED,
};

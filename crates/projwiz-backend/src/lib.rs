//! # projwiz-backend
//!
//! Provisions a hosted app backend for a freshly scaffolded project by
//! driving the backend CLI:
//! - creates the backend project with retries
//! - registers iOS, Android, and Web apps and reads their ids
//! - creates the default document database
//! - downloads each app's SDK config
//! - merges everything into the project's consolidated app config
//!
//! All CLI calls go through [`projwiz_core::process::CommandRunner`], so
//! tests can script the CLI without spawning processes.

pub mod app_id;
pub mod consolidated;
pub mod error;
pub mod provisioner;
pub mod scaffold;
pub mod sdk_config;

pub use app_id::{extract_app_id, AppIdExtractor, AppIdMatcher, PatternMatcher, TokenScanMatcher};
pub use consolidated::{
    merge_backend_config, MergeInput, MergeOutcome, CONSOLIDATED_CONFIG_PATH,
    TYPE_DEFINITIONS_PATH,
};
pub use error::{Error, Result};
pub use provisioner::{BackendProvisioner, ProvisionReport, ProvisionRequest};
pub use sdk_config::{fallback_credentials, parse_sdk_config, BackendCredentials, CredentialSet};

//! Error types for projwiz-projects

use projwiz_core::process::CommandError;
use thiserror::Error;

/// Result type alias using projwiz-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Request is missing a required field
    #[error("Missing required fields: {fields}")]
    MissingFields { fields: String },

    /// Invalid project name
    #[error("Invalid project name: {name}. Must contain only lowercase letters, numbers, and hyphens")]
    InvalidProjectName { name: String },

    /// Request field would be read by git as a command-line option
    #[error("Invalid {field}: '{value}' must not start with '-'")]
    OptionLikeValue { field: String, value: String },

    /// Clone failed
    #[error("Failed to clone template repository: {message}")]
    CloneFailed { message: String },

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Push was rejected and could not be reconciled
    #[error("Push rejected: {message}")]
    PushRejected { message: String },

    /// The working directory disappeared before it could be finalized
    #[error("Working directory vanished: {path}")]
    WorkingDirVanished { path: String },

    /// External command could not be run or did not finish
    #[error(transparent)]
    Command(#[from] CommandError),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing fields error
    pub fn missing_fields(fields: impl Into<String>) -> Self {
        Self::MissingFields {
            fields: fields.into(),
        }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>) -> Self {
        Self::InvalidProjectName { name: name.into() }
    }

    /// Create an option-like value error
    pub fn option_like_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::OptionLikeValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Create a push rejected error
    pub fn push_rejected(message: impl Into<String>) -> Self {
        Self::PushRejected {
            message: message.into(),
        }
    }

    /// Create a working directory vanished error
    pub fn working_dir_vanished(path: impl Into<String>) -> Self {
        Self::WorkingDirVanished { path: path.into() }
    }
}

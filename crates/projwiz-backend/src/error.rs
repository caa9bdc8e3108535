//! Error types for projwiz-backend

use projwiz_core::process::CommandError;
use thiserror::Error;

/// Result type alias using projwiz-backend's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Backend provisioning error types
#[derive(Error, Debug)]
pub enum Error {
    /// The backend CLI rejected project creation
    #[error("Failed to create backend project {project_id}: {message}")]
    ProjectCreation { project_id: String, message: String },

    /// A backend CLI command exited unsuccessfully
    #[error("Backend command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// The backend CLI could not be run or did not finish
    #[error(transparent)]
    Command(#[from] CommandError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a project creation error
    pub fn project_creation(project_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProjectCreation {
            project_id: project_id.into(),
            message: message.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a command timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Command(e) if e.is_timeout())
    }
}

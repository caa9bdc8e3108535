//! Error types for projwiz-core

use thiserror::Error;

/// Result type alias using projwiz-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for projwiz
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// Configuration update referenced an unknown key
    #[error("Unknown configuration key: {key}")]
    UnknownConfigKey { key: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown platform name
    #[error("Unknown platform: {platform}. Valid platforms: ios, android, web")]
    InvalidPlatform { platform: String },
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown config key error
    pub fn unknown_config_key(key: impl Into<String>) -> Self {
        Self::UnknownConfigKey { key: key.into() }
    }

    /// Create an invalid platform error
    pub fn invalid_platform(platform: impl Into<String>) -> Self {
        Self::InvalidPlatform {
            platform: platform.into(),
        }
    }
}

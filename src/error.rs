//! Error types for rookery
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary converts to `anyhow` at its outermost boundary.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Settings document error: {0}")]
    Document(#[from] DocumentError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid {field} class selector: {source}")]
    InvalidClass {
        field: &'static str,
        source: PluginClassError,
    },

    #[error("Invalid assignment '{assignment}': {reason}")]
    InvalidOverride { assignment: String, reason: String },

    #[error(
        "proxy.redis.url conflicts with proxy.redis.{field}; remove the legacy url or the split field"
    )]
    LegacyBackendConflict { field: &'static str },
}

impl ConfigError {
    /// Shorthand for an [`Invalid`](Self::Invalid) error.
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Missing`](Self::Missing) error.
    pub fn missing(field: impl Into<String>) -> Self {
        ConfigError::Missing {
            field: field.into(),
        }
    }
}

/// A malformed plugin class selector (spawner, proxy, or authenticator)
#[derive(Error, Debug)]
#[error("'{class}': {reason}")]
pub struct PluginClassError {
    pub class: String,
    pub reason: String,
}

/// Settings-document errors (option paths and rendering)
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Option path must not be empty")]
    EmptyPath,

    #[error("Invalid option path '{path}': segment '{segment}' is not an identifier")]
    InvalidPath { path: String, segment: String },

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

//! Error types for the settings crate.

use sketchkit_core::ConfigurationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to load settings from {path}: {reason}")]
    LoadError { path: PathBuf, reason: String },

    /// The settings file could not be written.
    #[error("Failed to save settings to {path}: {reason}")]
    SaveError { path: PathBuf, reason: String },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The platform config directory could not be resolved.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// A settings value failed validation.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ConfigurationError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

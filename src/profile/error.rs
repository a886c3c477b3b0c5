//! Profile storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors raised while reading or writing profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Saving would overwrite an existing profile.
    #[error("Profile '{name}' already exists: {}", path.display())]
    AlreadyExists { name: String, path: PathBuf },

    /// Profile name is empty or whitespace.
    #[error("Profile name cannot be empty or whitespace")]
    InvalidName,

    /// Application name prefix is empty or whitespace.
    #[error("Application name cannot be empty or whitespace")]
    InvalidAppName,

    /// No profiles root was given and the home directory is unknown.
    #[error("Could not determine the home directory for profiles")]
    NoHomeDirectory,

    /// No saved profile with this name.
    #[error("Profile '{name}' not found: {}", path.display())]
    NotFound { name: String, path: PathBuf },

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encode or decode failure.
    #[error("Invalid profile JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

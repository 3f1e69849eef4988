//! Error types for settings persistence.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        /// Settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file could not be written.
    #[error("failed to write settings to {}: {source}", path.display())]
    Write {
        /// Settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid settings JSON.
    #[error("malformed settings in {}: {source}", path.display())]
    Parse {
        /// Settings file.
        path: PathBuf,
        /// Deserialisation error.
        source: serde_json::Error,
    },

    /// Settings could not be serialised.
    #[error("failed to serialise settings: {0}")]
    Serialise(#[from] serde_json::Error),

    /// Refused to replace an existing settings file.
    #[error("settings file {} already exists", path.display())]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },
}

impl SettingsError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

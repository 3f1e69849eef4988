//! Error types for templates and script creation.

use std::io;
use std::path::{Path, PathBuf};

use codemanager_inspector::InspectionError;
use thiserror::Error;

/// Errors raised while handling templates or creating scripts.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// A template or the template folder could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A template or script could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Refused to replace an existing file.
    #[error("{} already exists", path.display())]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },

    /// A placeholder in the template has no value.
    #[error("no value for placeholder %{name}%")]
    MissingValue {
        /// Placeholder name without the percent signs.
        name: String,
    },

    /// The script name cannot be used as a file name.
    #[error("invalid script name {name:?}")]
    InvalidScriptName {
        /// Rejected name.
        name: String,
    },

    /// The path does not name a template file.
    #[error("{} is not a script template", path.display())]
    NotATemplate {
        /// Rejected path.
        path: PathBuf,
    },

    /// The placeholder substitution failed.
    #[error(transparent)]
    Inspection(#[from] InspectionError),
}

impl TemplateError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Maps a failed `create_new` open, keeping "already exists" apart.
    pub(crate) fn create(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AlreadyExists {
            Self::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            Self::Write {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

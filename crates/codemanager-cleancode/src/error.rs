//! Error types for scanning and regex testing.

use std::path::PathBuf;

use codemanager_inspector::InspectionError;
use thiserror::Error;

/// Errors that abort a scan or a regex test.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    /// A script folder could not be listed.
    #[error("failed to list {}: {source}", path.display())]
    ReadDir {
        /// Folder being listed.
        path: PathBuf,
        /// Underlying traversal error.
        source: walkdir::Error,
    },

    /// A configured regex does not compile.
    #[error("regex {name:?} does not compile: {message}")]
    InvalidRegex {
        /// Name of the regex.
        name: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// The inspection engine rejected an operation.
    #[error(transparent)]
    Inspection(#[from] InspectionError),
}

//! Error types for inspection sessions and the file lock registry.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::handle::SessionId;
use crate::registry::LockMode;

/// Broad classes of inspection failures.
///
/// Callers that only need to decide between retrying, reporting, or fixing
/// their own code can branch on the category instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The pattern or regex options are unusable.
    Configuration,
    /// Another session holds a conflicting lock on the file.
    Contention,
    /// A handle outlived the decomposition that issued it.
    StaleHandle,
    /// Reading or writing the backing file failed.
    Io,
    /// The caller broke the session protocol.
    Misuse,
}

/// Errors from inspection sessions and the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InspectionError {
    /// The regular expression failed to compile.
    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidPattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// A regex option cannot be honoured by the requested operation.
    #[error("regex option `{option}` is not supported by {operation}")]
    UnsupportedOption {
        /// Name of the rejected option.
        option: &'static str,
        /// Operation that rejected it.
        operation: &'static str,
    },

    /// The file is locked in a mode that conflicts with the request.
    #[error("{} is held for {held}; {requested} access refused", path.display())]
    Contention {
        /// Canonical path of the contended file.
        path: PathBuf,
        /// Strongest lock currently held by other sessions.
        held: LockMode,
        /// Lock mode that was requested.
        requested: LockMode,
    },

    /// The handle was issued before the last commit or cancel.
    #[error("segment handle from generation {handle} is stale (session is at generation {current})")]
    StaleHandle {
        /// Generation recorded in the handle.
        handle: u64,
        /// Current generation of the session.
        current: u64,
    },

    /// The handle was issued by another session.
    #[error("segment handle belongs to session {owner}, not {session}")]
    ForeignHandle {
        /// Session that issued the handle.
        owner: SessionId,
        /// Session the handle was presented to.
        session: SessionId,
    },

    /// A read-write session was queried while its decomposition was pending.
    #[error("session {session} already has an active decomposition; commit or cancel it first")]
    DecompositionActive {
        /// Offending session.
        session: SessionId,
    },

    /// A write operation needs a decomposition but none is active.
    #[error("session {session} has no active decomposition")]
    NoActiveDecomposition {
        /// Offending session.
        session: SessionId,
    },

    /// A mutation was attempted on a read-only file session.
    #[error("session {session} has no write permission for {}", path.display())]
    ReadOnly {
        /// Offending session.
        session: SessionId,
        /// File the session inspects.
        path: PathBuf,
    },

    /// The session was closed through the registry.
    #[error("session {session} is closed")]
    Closed {
        /// Closed session.
        session: SessionId,
    },

    /// The registry holds no lock record for the session.
    #[error("session {session} holds no lock in this registry")]
    UnknownSession {
        /// Session without a record.
        session: SessionId,
    },

    /// Line numbers were requested without line tracking.
    #[error("line tracking is disabled for session {session}")]
    LineTrackingDisabled {
        /// Offending session.
        session: SessionId,
    },

    /// Whole-document replacement is only available for text sessions.
    #[error("session {session} inspects a file; only text sessions can replace their document")]
    TextOnly {
        /// Offending session.
        session: SessionId,
    },

    /// File inspections need a path.
    #[error("file inspection requires a non-empty path")]
    EmptyPath,

    /// The backing file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The backing file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        /// File that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Match ranges were overlapping or out of order.
    #[error("match starting at byte {start} precedes the cut cursor at byte {cursor}")]
    UnorderedMatches {
        /// Start of the offending range.
        start: usize,
        /// End of the previously cut range.
        cursor: usize,
    },

    /// A match range does not fit the document.
    #[error("match range {start}..{end} does not fit a document of {len} bytes")]
    MatchOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Document length in bytes.
        len: usize,
    },
}

impl InspectionError {
    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a contention error.
    #[must_use]
    pub fn contention(path: impl Into<PathBuf>, held: LockMode, requested: LockMode) -> Self {
        Self::Contention {
            path: path.into(),
            held,
            requested,
        }
    }

    /// Creates a file read error.
    #[must_use]
    pub fn file_read(path: &Path, source: io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a file write error.
    #[must_use]
    pub fn file_write(path: &Path, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the broad class of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPattern { .. } | Self::UnsupportedOption { .. } => {
                ErrorCategory::Configuration
            }
            Self::Contention { .. } => ErrorCategory::Contention,
            Self::StaleHandle { .. } => ErrorCategory::StaleHandle,
            Self::FileRead { .. } | Self::FileWrite { .. } => ErrorCategory::Io,
            Self::ForeignHandle { .. }
            | Self::DecompositionActive { .. }
            | Self::NoActiveDecomposition { .. }
            | Self::ReadOnly { .. }
            | Self::Closed { .. }
            | Self::UnknownSession { .. }
            | Self::LineTrackingDisabled { .. }
            | Self::TextOnly { .. }
            | Self::EmptyPath
            | Self::UnorderedMatches { .. }
            | Self::MatchOutOfBounds { .. } => ErrorCategory::Misuse,
        }
    }
}

//! File lock arbitration between inspection sessions.
//!
//! The registry is advisory: it only knows about sessions it opened and takes
//! no operating-system locks. Any number of sessions may read a file; a writer
//! needs the file to itself.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::InspectionError;
use crate::handle::SessionId;
use crate::session::{Inspection, InspectionMode};

/// Lock held on a file by one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LockMode {
    /// Shared read access.
    Read,
    /// Exclusive write access.
    Write,
}

impl From<InspectionMode> for LockMode {
    fn from(mode: InspectionMode) -> Self {
        match mode {
            InspectionMode::Read => Self::Read,
            InspectionMode::ReadWrite => Self::Write,
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LockRecord {
    session: SessionId,
    mode: LockMode,
}

/// Opens inspections and tracks which files they hold.
#[derive(Debug, Default)]
pub struct Inspector {
    locks: HashMap<PathBuf, Vec<LockRecord>>,
}

impl Inspector {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an inspection of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionError::Contention`] when the request conflicts with
    /// a lock held by another session, [`InspectionError::EmptyPath`] for an
    /// empty path, and [`InspectionError::FileRead`] when the file cannot be
    /// resolved or read. A failed open records no lock.
    pub fn inspect_file(
        &mut self,
        path: impl AsRef<Path>,
        mode: InspectionMode,
    ) -> Result<Inspection, InspectionError> {
        let key = lock_key(path.as_ref())?;
        let requested = LockMode::from(mode);
        if let Some(held) = self.strongest_lock(&key, None)
            && (held == LockMode::Write || requested == LockMode::Write)
        {
            warn!(path = %key.display(), %held, %requested, "file inspection refused");
            return Err(InspectionError::contention(key, held, requested));
        }

        let session = SessionId::next();
        let inspection = Inspection::open_file(session, key.clone(), mode)?;
        self.locks.entry(key).or_default().push(LockRecord {
            session,
            mode: requested,
        });
        Ok(inspection)
    }

    /// Opens an inspection of an in-memory string.
    ///
    /// Text inspections are always writable and never touch the lock table.
    #[must_use]
    #[expect(clippy::unused_self, reason = "text inspections need no lock state")]
    pub fn inspect_text(&self, text: impl Into<String>) -> Inspection {
        Inspection::from_text(text)
    }

    /// Releases the lock held by `inspection` and marks it closed.
    ///
    /// Closing a text inspection or an already closed one does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionError::UnknownSession`] when this registry holds no
    /// record for the inspection.
    pub fn close(&mut self, inspection: &mut Inspection) -> Result<(), InspectionError> {
        if inspection.is_closed() {
            return Ok(());
        }
        let Some(path) = inspection.path().map(Path::to_path_buf) else {
            return Ok(());
        };

        let session = inspection.id();
        let removed = self.locks.get_mut(&path).is_some_and(|records| {
            let before = records.len();
            records.retain(|record| record.session != session);
            records.len() < before
        });
        if self.locks.get(&path).is_some_and(Vec::is_empty) {
            self.locks.remove(&path);
        }
        if !removed {
            error!(%session, path = %path.display(), "close requested for an unregistered session");
            return Err(InspectionError::UnknownSession { session });
        }

        inspection.close();
        debug!(%session, path = %path.display(), "released file lock");
        Ok(())
    }

    /// Upgrades a read-only file inspection to read-write.
    ///
    /// The upgrade succeeds only while no other session holds the file. Text
    /// inspections and sessions that already write succeed immediately.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionError::Contention`] while another session holds the
    /// file, [`InspectionError::Closed`] for a closed inspection and
    /// [`InspectionError::UnknownSession`] when this registry did not open it.
    pub fn grant_write_permission(
        &mut self,
        inspection: &mut Inspection,
    ) -> Result<(), InspectionError> {
        inspection.ensure_open()?;
        if inspection.mode() == InspectionMode::ReadWrite {
            return Ok(());
        }
        let Some(path) = inspection.path().map(Path::to_path_buf) else {
            return Ok(());
        };

        let session = inspection.id();
        if let Some(held) = self.strongest_lock(&path, Some(session)) {
            warn!(%session, path = %path.display(), %held, "write permission refused");
            return Err(InspectionError::contention(path, held, LockMode::Write));
        }

        let Some(record) = self
            .locks
            .get_mut(&path)
            .and_then(|records| records.iter_mut().find(|record| record.session == session))
        else {
            error!(%session, path = %path.display(), "write permission requested for an unregistered session");
            return Err(InspectionError::UnknownSession { session });
        };
        inspection.upgrade_to_write()?;
        record.mode = LockMode::Write;
        Ok(())
    }

    /// Strongest lock currently held on `path`, if any.
    #[must_use]
    pub fn lock_mode(&self, path: &Path) -> Option<LockMode> {
        self.strongest_lock(&lookup_key(path), None)
    }

    /// Number of sessions holding `path`.
    #[must_use]
    pub fn holders(&self, path: &Path) -> usize {
        self.locks.get(&lookup_key(path)).map_or(0, Vec::len)
    }

    /// Number of files with at least one holder.
    #[must_use]
    pub fn open_files(&self) -> usize {
        self.locks.len()
    }

    fn strongest_lock(&self, key: &Path, except: Option<SessionId>) -> Option<LockMode> {
        self.locks
            .get(key)?
            .iter()
            .filter(|record| Some(record.session) != except)
            .map(|record| record.mode)
            .max()
    }
}

fn lock_key(path: &Path) -> Result<PathBuf, InspectionError> {
    if path.as_os_str().is_empty() {
        warn!("file inspection requested without a path");
        return Err(InspectionError::EmptyPath);
    }
    fs::canonicalize(path).map_err(|err| InspectionError::file_read(path, err))
}

fn lookup_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

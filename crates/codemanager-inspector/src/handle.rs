//! Session identifiers and segment handles.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of one inspection session.
///
/// Identifiers are unique for the lifetime of the process, so a handle can
/// never be confused with one issued by another session, even across
/// registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Addresses one segment of a session's current decomposition.
///
/// The handle stays valid until the session commits, cancels or starts a new
/// decomposition. Deleting a segment empties it in place, so handles to its
/// neighbours are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHandle {
    session: SessionId,
    generation: u64,
    slot: usize,
}

impl SegmentHandle {
    pub(crate) const fn new(session: SessionId, generation: u64, slot: usize) -> Self {
        Self {
            session,
            generation,
            slot,
        }
    }

    /// Session that issued the handle.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Generation of the decomposition the handle belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) const fn slot(&self) -> usize {
        self.slot
    }
}

//! Inspection sessions: one document, one decomposition at a time.
//!
//! A session starts `Idle`. A query (`find`, `find_all`, `get_everything`)
//! decomposes the document into segments and moves it to `Active`. Commit or
//! cancel clears the segments, advances the generation, and returns it to
//! `Idle`; every handle of the previous generation becomes stale.

use std::fmt;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::cutter::{Piece, PieceKind, cut_all, cut_single};
use crate::error::InspectionError;
use crate::handle::{SegmentHandle, SessionId};
use crate::line_ending::normalize_line_endings;
use crate::segment::{MatchCaptures, Segment};
use crate::settings::InspectionSettings;
use crate::store::SegmentStore;

/// Access requested for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectionMode {
    /// Queries only. A new query implicitly commits the previous one.
    #[default]
    Read,
    /// Queries and edits. Each decomposition must be committed or cancelled.
    ReadWrite,
}

impl fmt::Display for InspectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::ReadWrite => "read-write",
        })
    }
}

/// Backing store of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A file on disk.
    File {
        /// Canonical path of the file.
        path: PathBuf,
        /// Final path component, for reports.
        file_name: String,
    },
    /// An in-memory string.
    Text,
}

/// Whether a decomposition is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No segments; queries may start.
    Idle,
    /// Segments exist and handles are live.
    Active,
}

/// Result of [`Inspection::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The document changed and was stored.
    Committed {
        /// Size of the stored document in bytes.
        bytes: usize,
    },
    /// Nothing changed, or the session is read-only.
    NoChanges,
}

impl CommitOutcome {
    /// Returns true when the document changed.
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// One inspection of a file or string.
///
/// File inspections are created through [`Inspector`](crate::Inspector), which
/// arbitrates access per path; text inspections need no arbitration.
#[derive(Debug)]
pub struct Inspection {
    id: SessionId,
    source: Source,
    mode: InspectionMode,
    auto_commit: bool,
    settings: InspectionSettings,
    document: String,
    segments: SegmentStore,
    state: SessionState,
    generation: u64,
    closed: bool,
}

impl Inspection {
    /// Creates a read-write inspection of `text`.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(
            SessionId::next(),
            Source::Text,
            InspectionMode::ReadWrite,
            text.into(),
        )
    }

    pub(crate) fn open_file(
        id: SessionId,
        path: PathBuf,
        mode: InspectionMode,
    ) -> Result<Self, InspectionError> {
        let document =
            fs::read_to_string(&path).map_err(|err| InspectionError::file_read(&path, err))?;
        let file_name = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        debug!(session = %id, path = %path.display(), %mode, "opened file inspection");
        Ok(Self::new(id, Source::File { path, file_name }, mode, document))
    }

    fn new(id: SessionId, source: Source, mode: InspectionMode, document: String) -> Self {
        Self {
            id,
            source,
            mode,
            auto_commit: mode == InspectionMode::Read,
            settings: InspectionSettings::default(),
            document,
            segments: SegmentStore::new(),
            state: SessionState::Idle,
            generation: 0,
            closed: false,
        }
    }

    /// Identifier of the session.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Backing store.
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// Path of the inspected file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File { path, .. } => Some(path),
            Source::Text => None,
        }
    }

    /// File name of the inspected file, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match &self.source {
            Source::File { file_name, .. } => Some(file_name),
            Source::Text => None,
        }
    }

    /// Access mode.
    #[must_use]
    pub const fn mode(&self) -> InspectionMode {
        self.mode
    }

    /// Whether a new query implicitly commits the pending decomposition.
    #[must_use]
    pub const fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Last committed document.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &InspectionSettings {
        &self.settings
    }

    /// Whether a decomposition is pending.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Generation of the current decomposition.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the session was closed through the registry.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether edits are permitted.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self.source, Source::Text) || matches!(self.mode, InspectionMode::ReadWrite)
    }

    /// Number of segments in the current decomposition, including emptied ones.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Replaces the session settings.
    ///
    /// # Errors
    ///
    /// Fails when the session is closed, or when a read-write session has a
    /// pending decomposition. A read-only session commits its decomposition
    /// first.
    pub fn set_settings(&mut self, settings: InspectionSettings) -> Result<(), InspectionError> {
        self.ensure_open()?;
        self.begin_query()?;
        self.settings = settings;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Decomposes the document around the first match of `pattern`.
    ///
    /// With [`RegexOptions::right_to_left`](crate::RegexOptions) the last match
    /// is used instead. Returns `None`, leaving the session idle, when nothing
    /// matches.
    ///
    /// # Errors
    ///
    /// Fails on an invalid pattern, on a closed session, or when a read-write
    /// session already has a pending decomposition.
    pub fn find(&mut self, pattern: &str) -> Result<Option<SegmentHandle>, InspectionError> {
        self.ensure_open()?;
        let regex = self.settings.compile(pattern)?;
        self.begin_query()?;

        let found = if self.settings.regex_options.right_to_left {
            regex.captures_iter(&self.document).last()
        } else {
            regex.captures(&self.document)
        };
        let Some(captures) = found.map(|captures| MatchCaptures::new(&regex, &captures)) else {
            debug!(session = %self.id, pattern, "no match");
            return Ok(None);
        };

        let pieces = cut_single(&self.document, captures.range())?;
        let handles = self.install(&pieces, vec![captures])?;
        Ok(handles.into_iter().next())
    }

    /// Decomposes the document around every match of `pattern`.
    ///
    /// Handles are returned in document order. An empty result leaves the
    /// session idle.
    ///
    /// # Errors
    ///
    /// Fails when the right-to-left option is set, on an invalid pattern, on a
    /// closed session, or when a read-write session already has a pending
    /// decomposition.
    pub fn find_all(&mut self, pattern: &str) -> Result<Vec<SegmentHandle>, InspectionError> {
        self.ensure_open()?;
        if self.settings.regex_options.right_to_left {
            warn!(session = %self.id, pattern, "find_all does not support right-to-left search");
            return Err(InspectionError::UnsupportedOption {
                option: "right_to_left",
                operation: "find_all",
            });
        }
        let regex = self.settings.compile(pattern)?;
        self.begin_query()?;

        let captures = collect_matches(&regex, &self.document);
        if captures.is_empty() {
            debug!(session = %self.id, pattern, "no match");
            return Ok(Vec::new());
        }
        let ranges: Vec<Range<usize>> = captures.iter().map(MatchCaptures::range).collect();
        let pieces = cut_all(&self.document, &ranges)?;
        self.install(&pieces, captures)
    }

    /// Decomposes the document into a single segment holding all of it.
    ///
    /// # Errors
    ///
    /// Fails on a closed session, or when a read-write session already has a
    /// pending decomposition.
    pub fn get_everything(&mut self) -> Result<SegmentHandle, InspectionError> {
        self.ensure_open()?;
        self.begin_query()?;
        let slot = self
            .segments
            .push_back(Segment::literal(self.document.clone()));
        self.activate();
        Ok(self.handle(slot))
    }

    // =========================================================================
    // Segment access
    // =========================================================================

    /// Returns the segment behind `handle`.
    ///
    /// # Errors
    ///
    /// Fails when the handle is stale or belongs to another session.
    pub fn segment(&self, handle: SegmentHandle) -> Result<&Segment, InspectionError> {
        let slot = self.resolve(handle)?;
        self.segments
            .get(slot)
            .ok_or_else(|| self.stale(handle))
    }

    /// Returns the current text of the segment behind `handle`.
    ///
    /// # Errors
    ///
    /// Fails when the handle is stale or belongs to another session.
    pub fn text(&self, handle: SegmentHandle) -> Result<&str, InspectionError> {
        self.segment(handle).map(Segment::text)
    }

    /// Handle of the segment before `handle`, if any.
    ///
    /// # Errors
    ///
    /// Fails when the handle is stale or belongs to another session.
    pub fn previous(&self, handle: SegmentHandle) -> Result<Option<SegmentHandle>, InspectionError> {
        let slot = self.resolve(handle)?;
        Ok(self.segments.previous(slot).map(|prev| self.handle(prev)))
    }

    /// Handle of the segment after `handle`, if any.
    ///
    /// # Errors
    ///
    /// Fails when the handle is stale or belongs to another session.
    pub fn next(&self, handle: SegmentHandle) -> Result<Option<SegmentHandle>, InspectionError> {
        let slot = self.resolve(handle)?;
        Ok(self.segments.next(slot).map(|next| self.handle(next)))
    }

    /// Handle of the first segment of the current decomposition.
    #[must_use]
    pub fn first(&self) -> Option<SegmentHandle> {
        self.segments.first().map(|slot| self.handle(slot))
    }

    /// Handle of the last segment of the current decomposition.
    #[must_use]
    pub fn last(&self) -> Option<SegmentHandle> {
        self.segments.last().map(|slot| self.handle(slot))
    }

    /// Segments of the current decomposition in document order.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        self.segments
            .iter()
            .map(|(slot, segment)| (self.handle(slot), segment))
    }

    /// Document as it would be committed now.
    ///
    /// Without a pending decomposition this is the stored document.
    #[must_use]
    pub fn current_text(&self) -> String {
        match self.state {
            SessionState::Idle => self.document.clone(),
            SessionState::Active => self.segments.reconstruct(),
        }
    }

    /// 1-based line on which the segment behind `handle` starts.
    ///
    /// # Errors
    ///
    /// Fails when line tracking is disabled, or when the handle is stale or
    /// belongs to another session.
    pub fn line_index(&self, handle: SegmentHandle) -> Result<usize, InspectionError> {
        let slot = self.resolve(handle)?;
        if !self.settings.track_lines {
            warn!(session = %self.id, "line index requested without line tracking");
            return Err(InspectionError::LineTrackingDisabled { session: self.id });
        }
        Ok(self
            .segments
            .preceding(slot)
            .map(|segment| segment.line_stats().advance())
            .fold(1, usize::saturating_add))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replaces the text of the segment behind `handle`.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions, or when the handle is stale or belongs to
    /// another session.
    pub fn set_text(
        &mut self,
        handle: SegmentHandle,
        text: impl Into<String>,
    ) -> Result<(), InspectionError> {
        self.ensure_writable()?;
        let slot = self.resolve(handle)?;
        let stale = self.stale(handle);
        let segment = self.segments.get_mut(slot).ok_or(stale)?;
        segment.set_text(text.into());
        Ok(())
    }

    /// Empties the segment behind `handle` in place.
    ///
    /// Handles to the deleted segment and its neighbours stay valid.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions, or when the handle is stale or belongs to
    /// another session.
    pub fn delete(&mut self, handle: SegmentHandle) -> Result<(), InspectionError> {
        self.ensure_writable()?;
        let slot = self.resolve(handle)?;
        let stale = self.stale(handle);
        let segment = self.segments.get_mut(slot).ok_or(stale)?;
        segment.clear();
        Ok(())
    }

    /// Inserts `text` before every other segment.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions or when no decomposition is active.
    pub fn add_first(&mut self, text: impl Into<String>) -> Result<SegmentHandle, InspectionError> {
        self.ensure_writable()?;
        self.ensure_active()?;
        let slot = self.segments.push_front(Segment::literal(text));
        Ok(self.handle(slot))
    }

    /// Inserts `text` after every other segment.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions or when no decomposition is active.
    pub fn add_last(&mut self, text: impl Into<String>) -> Result<SegmentHandle, InspectionError> {
        self.ensure_writable()?;
        self.ensure_active()?;
        let slot = self.segments.push_back(Segment::literal(text));
        Ok(self.handle(slot))
    }

    /// Inserts `text` directly before the segment behind `anchor`.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions, or when the anchor is stale or belongs to
    /// another session.
    pub fn add_before(
        &mut self,
        anchor: SegmentHandle,
        text: impl Into<String>,
    ) -> Result<SegmentHandle, InspectionError> {
        self.ensure_writable()?;
        let slot = self.resolve(anchor)?;
        let inserted = self
            .segments
            .insert_before(slot, Segment::literal(text))
            .ok_or_else(|| self.stale(anchor))?;
        Ok(self.handle(inserted))
    }

    /// Inserts `text` directly after the segment behind `anchor`.
    ///
    /// # Errors
    ///
    /// Fails on read-only sessions, or when the anchor is stale or belongs to
    /// another session.
    pub fn add_after(
        &mut self,
        anchor: SegmentHandle,
        text: impl Into<String>,
    ) -> Result<SegmentHandle, InspectionError> {
        self.ensure_writable()?;
        let slot = self.resolve(anchor)?;
        let inserted = self
            .segments
            .insert_after(slot, Segment::literal(text))
            .ok_or_else(|| self.stale(anchor))?;
        Ok(self.handle(inserted))
    }

    /// Replaces the whole document of a text session.
    ///
    /// Any pending decomposition is discarded.
    ///
    /// # Errors
    ///
    /// Fails for file sessions and closed sessions.
    pub fn set_everything(&mut self, text: impl Into<String>) -> Result<(), InspectionError> {
        self.ensure_open()?;
        if !matches!(self.source, Source::Text) {
            warn!(session = %self.id, "whole-document replacement refused for a file session");
            return Err(InspectionError::TextOnly { session: self.id });
        }
        self.reset();
        self.document = text.into();
        Ok(())
    }

    // =========================================================================
    // Commit / cancel
    // =========================================================================

    /// Stores the reconstructed document and returns the session to idle.
    ///
    /// Text sessions replace their document. File sessions write it to disk
    /// with line endings normalised to the host convention. Read-only sessions
    /// only release their decomposition.
    ///
    /// # Errors
    ///
    /// Fails on a closed session, or when the file cannot be written. After a
    /// failed write the decomposition and its handles are untouched, so the
    /// commit can be retried.
    pub fn commit(&mut self) -> Result<CommitOutcome, InspectionError> {
        self.ensure_open()?;
        if self.state == SessionState::Idle {
            return Ok(CommitOutcome::NoChanges);
        }
        if !self.is_writable() {
            self.reset();
            return Ok(CommitOutcome::NoChanges);
        }

        let updated = self.segments.reconstruct();
        if updated == self.document {
            self.reset();
            return Ok(CommitOutcome::NoChanges);
        }

        match &self.source {
            Source::Text => self.document = updated,
            Source::File { path, .. } => {
                let normalized = normalize_line_endings(&updated).into_owned();
                write_atomic(path, &normalized)?;
                debug!(session = %self.id, path = %path.display(), bytes = normalized.len(), "committed file inspection");
                self.document = normalized;
            }
        }
        self.reset();
        Ok(CommitOutcome::Committed {
            bytes: self.document.len(),
        })
    }

    /// Discards the pending decomposition and every edit in it.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Active {
            debug!(session = %self.id, generation = self.generation, "cancelled decomposition");
        }
        self.reset();
    }

    // =========================================================================
    // Registry hooks
    // =========================================================================

    pub(crate) fn upgrade_to_write(&mut self) -> Result<(), InspectionError> {
        self.ensure_open()?;
        if self.mode == InspectionMode::ReadWrite {
            return Ok(());
        }
        self.reset();
        self.mode = InspectionMode::ReadWrite;
        self.auto_commit = false;
        debug!(session = %self.id, "granted write permission");
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        self.reset();
        self.closed = true;
        debug!(session = %self.id, "closed inspection");
    }

    pub(crate) fn ensure_open(&self) -> Result<(), InspectionError> {
        if self.closed {
            warn!(session = %self.id, "operation on a closed inspection");
            return Err(InspectionError::Closed { session: self.id });
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin_query(&mut self) -> Result<(), InspectionError> {
        match (self.state, self.auto_commit) {
            (SessionState::Idle, _) => Ok(()),
            (SessionState::Active, true) => {
                self.reset();
                Ok(())
            }
            (SessionState::Active, false) => {
                error!(
                    session = %self.id,
                    generation = self.generation,
                    "new decomposition requested before the pending one was committed"
                );
                Err(InspectionError::DecompositionActive { session: self.id })
            }
        }
    }

    fn install(
        &mut self,
        pieces: &[Piece],
        matches: Vec<MatchCaptures>,
    ) -> Result<Vec<SegmentHandle>, InspectionError> {
        let mut captures: Vec<Option<MatchCaptures>> = matches.into_iter().map(Some).collect();
        let mut prepared = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let text = piece.text(&self.document).ok_or_else(|| {
                let range = piece.range();
                InspectionError::MatchOutOfBounds {
                    start: range.start,
                    end: range.end,
                    len: self.document.len(),
                }
            })?;
            let segment = match piece.kind() {
                PieceKind::Literal => Segment::literal(text),
                PieceKind::Match(index) => match captures.get_mut(index).and_then(Option::take) {
                    Some(data) => Segment::matched(text, data),
                    None => Segment::literal(text),
                },
            };
            prepared.push(segment);
        }

        let mut handles = Vec::new();
        for segment in prepared {
            let is_match = segment.is_match();
            let slot = self.segments.push_back(segment);
            if is_match {
                handles.push(self.handle(slot));
            }
        }
        self.activate();
        Ok(handles)
    }

    fn activate(&mut self) {
        self.state = SessionState::Active;
        debug!(
            session = %self.id,
            generation = self.generation,
            segments = self.segments.len(),
            "decomposition active"
        );
    }

    fn reset(&mut self) {
        self.segments.clear();
        self.state = SessionState::Idle;
        self.generation = self.generation.wrapping_add(1);
    }

    fn ensure_writable(&self) -> Result<(), InspectionError> {
        self.ensure_open()?;
        if self.is_writable() {
            return Ok(());
        }
        let path = self.path().map(Path::to_path_buf).unwrap_or_default();
        warn!(session = %self.id, path = %path.display(), "edit refused on a read-only inspection");
        Err(InspectionError::ReadOnly {
            session: self.id,
            path,
        })
    }

    fn ensure_active(&self) -> Result<(), InspectionError> {
        if self.state == SessionState::Active {
            return Ok(());
        }
        warn!(session = %self.id, "edit requires an active decomposition");
        Err(InspectionError::NoActiveDecomposition { session: self.id })
    }

    fn resolve(&self, handle: SegmentHandle) -> Result<usize, InspectionError> {
        self.ensure_open()?;
        if handle.session() != self.id {
            warn!(session = %self.id, owner = %handle.session(), "handle from another session");
            return Err(InspectionError::ForeignHandle {
                owner: handle.session(),
                session: self.id,
            });
        }
        if handle.generation() != self.generation || !self.segments.contains(handle.slot()) {
            warn!(
                session = %self.id,
                handle_generation = handle.generation(),
                generation = self.generation,
                "stale segment handle"
            );
            return Err(self.stale(handle));
        }
        Ok(handle.slot())
    }

    const fn stale(&self, handle: SegmentHandle) -> InspectionError {
        InspectionError::StaleHandle {
            handle: handle.generation(),
            current: self.generation,
        }
    }

    const fn handle(&self, slot: usize) -> SegmentHandle {
        SegmentHandle::new(self.id, self.generation, slot)
    }
}

fn collect_matches(regex: &Regex, document: &str) -> Vec<MatchCaptures> {
    regex
        .captures_iter(document)
        .map(|captures| MatchCaptures::new(regex, &captures))
        .collect()
}

fn write_atomic(path: &Path, content: &str) -> Result<(), InspectionError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp =
        NamedTempFile::new_in(parent).map_err(|err| InspectionError::file_write(path, err))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| InspectionError::file_write(path, err))?;
    if let Ok(metadata) = fs::metadata(path)
        && let Err(err) = temp.as_file().set_permissions(metadata.permissions())
    {
        debug!(path = %path.display(), error = %err, "could not carry file permissions over");
    }
    temp.persist(path)
        .map_err(|err| InspectionError::file_write(path, err.error))?;
    Ok(())
}

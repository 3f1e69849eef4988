//! Splitting a document around match ranges.
//!
//! The cutter is pure: it validates every range before producing any piece, so
//! a rejected input leaves nothing half built.

use std::ops::Range;

use tracing::error;

use crate::error::InspectionError;

/// What a piece of a cut document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    /// Text between matches.
    Literal,
    /// The match at this index of the input ranges.
    Match(usize),
}

/// One contiguous run of a cut document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    range: Range<usize>,
    kind: PieceKind,
}

impl Piece {
    const fn literal(range: Range<usize>) -> Self {
        Self {
            range,
            kind: PieceKind::Literal,
        }
    }

    const fn matched(range: Range<usize>, index: usize) -> Self {
        Self {
            range,
            kind: PieceKind::Match(index),
        }
    }

    /// Byte range of the piece in the document.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Kind of the piece.
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Whether the piece is a match.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self.kind, PieceKind::Match(_))
    }

    /// Text of the piece within `document`.
    #[must_use]
    pub fn text<'a>(&self, document: &'a str) -> Option<&'a str> {
        document.get(self.range.clone())
    }
}

/// Cuts `document` around a single match.
///
/// Produces up to three pieces: the text before the match (when non-empty),
/// the match, and the text after it (when non-empty).
///
/// # Errors
///
/// Returns [`InspectionError::MatchOutOfBounds`] when the range does not fit
/// the document or splits a UTF-8 sequence.
pub fn cut_single(document: &str, range: Range<usize>) -> Result<Vec<Piece>, InspectionError> {
    cut_all(document, std::slice::from_ref(&range))
}

/// Cuts `document` around sorted, non-overlapping match ranges.
///
/// Literal runs and matches alternate in document order; empty literal runs
/// are omitted. Concatenating the pieces reproduces the document.
///
/// # Errors
///
/// Returns [`InspectionError::UnorderedMatches`] when a range starts before the
/// end of the previous one, and [`InspectionError::MatchOutOfBounds`] when a
/// range does not fit the document.
pub fn cut_all(document: &str, ranges: &[Range<usize>]) -> Result<Vec<Piece>, InspectionError> {
    let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;

    for (index, range) in ranges.iter().enumerate() {
        if range.start < cursor {
            error!(
                start = range.start,
                cursor, "match ranges overlap or are out of order"
            );
            return Err(InspectionError::UnorderedMatches {
                start: range.start,
                cursor,
            });
        }
        if !fits(document, range) {
            return Err(InspectionError::MatchOutOfBounds {
                start: range.start,
                end: range.end,
                len: document.len(),
            });
        }
        if range.start > cursor {
            pieces.push(Piece::literal(cursor..range.start));
        }
        pieces.push(Piece::matched(range.clone(), index));
        cursor = range.end;
    }

    if cursor < document.len() {
        pieces.push(Piece::literal(cursor..document.len()));
    }
    Ok(pieces)
}

fn fits(document: &str, range: &Range<usize>) -> bool {
    range.start <= range.end
        && range.end <= document.len()
        && document.is_char_boundary(range.start)
        && document.is_char_boundary(range.end)
}

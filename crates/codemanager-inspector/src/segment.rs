//! Text segments and the match data they carry.

use std::ops::Range;

use regex::{Captures, Regex};

/// Line bookkeeping for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    line_count: usize,
    ends_with_newline: bool,
}

impl LineStats {
    /// Computes the line statistics of `text`.
    ///
    /// Every `\n` closes a line; trailing text without a newline counts as a
    /// further, open line. Empty text has no lines and is treated as ending in
    /// a newline so it never shifts the line of the segment that follows.
    #[must_use]
    pub fn of(text: &str) -> Self {
        if text.is_empty() {
            return Self {
                line_count: 0,
                ends_with_newline: true,
            };
        }
        let newlines = text.bytes().filter(|byte| *byte == b'\n').count();
        if text.ends_with('\n') {
            Self {
                line_count: newlines,
                ends_with_newline: true,
            }
        } else {
            Self {
                line_count: newlines + 1,
                ends_with_newline: false,
            }
        }
    }

    /// Number of lines the segment spans.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    /// Whether the segment ends with `\n`.
    #[must_use]
    pub const fn ends_with_newline(&self) -> bool {
        self.ends_with_newline
    }

    /// Lines a following segment is pushed down by this one.
    ///
    /// An open last line is shared with the next segment.
    #[must_use]
    pub const fn advance(&self) -> usize {
        if self.ends_with_newline {
            self.line_count
        } else {
            self.line_count.saturating_sub(1)
        }
    }
}

/// One capture group of a regex match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedGroup {
    name: Option<String>,
    text: String,
    range: Range<usize>,
}

impl CapturedGroup {
    /// Group name, when the group is named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Captured text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of the capture in the source document.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Owned copy of a regex match and its capture groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCaptures {
    pattern: String,
    range: Range<usize>,
    groups: Vec<Option<CapturedGroup>>,
}

impl MatchCaptures {
    pub(crate) fn new(regex: &Regex, captures: &Captures<'_>) -> Self {
        let groups = regex
            .capture_names()
            .enumerate()
            .map(|(index, name)| {
                captures.get(index).map(|found| CapturedGroup {
                    name: name.map(str::to_owned),
                    text: found.as_str().to_owned(),
                    range: found.range(),
                })
            })
            .collect();
        let range = captures.get(0).map_or(0..0, |whole| whole.range());
        Self {
            pattern: regex.as_str().to_owned(),
            range,
            groups,
        }
    }

    /// Pattern that produced the match.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Byte range of the whole match in the source document.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Text of the numbered group; group 0 is the whole match.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups
            .get(index)
            .and_then(Option::as_ref)
            .map(CapturedGroup::text)
    }

    /// Text of the named group.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .flatten()
            .find(|group| group.name() == Some(name))
            .map(CapturedGroup::text)
    }

    /// Every group that participated in the match, with its index.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &CapturedGroup)> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(index, group)| group.as_ref().map(|found| (index, found)))
    }

    /// Number of group slots in the pattern, including group 0.
    #[must_use]
    pub const fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Where a segment's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOrigin {
    /// Text between matches, or text inserted by the caller.
    Literal,
    /// A regex match.
    Match(MatchCaptures),
}

/// A run of text inside a decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    origin: SegmentOrigin,
}

impl Segment {
    pub(crate) fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: SegmentOrigin::Literal,
        }
    }

    pub(crate) fn matched(text: impl Into<String>, captures: MatchCaptures) -> Self {
        Self {
            text: text.into(),
            origin: SegmentOrigin::Match(captures),
        }
    }

    /// Current text of the segment.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }

    /// Whether the segment is empty, for instance after a delete.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Origin of the segment.
    #[must_use]
    pub const fn origin(&self) -> &SegmentOrigin {
        &self.origin
    }

    /// Match data, when the segment was produced by a regex match.
    #[must_use]
    pub const fn captures(&self) -> Option<&MatchCaptures> {
        match &self.origin {
            SegmentOrigin::Match(captures) => Some(captures),
            SegmentOrigin::Literal => None,
        }
    }

    /// Whether the segment was produced by a regex match.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self.origin, SegmentOrigin::Match(_))
    }

    /// Line statistics of the current text.
    #[must_use]
    pub fn line_stats(&self) -> LineStats {
        LineStats::of(&self.text)
    }
}

//! Trying a pattern against sample text before using it in a rule.

use std::fmt;

use codemanager_inspector::{Inspection, InspectionSettings, RegexOptions};

use crate::error::ScanError;

/// A named group of a tester match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterGroup {
    /// Group name.
    pub name: String,
    /// Captured text.
    pub value: String,
}

/// One match found by the tester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterMatch {
    /// Position of the match in the result list.
    pub index: usize,
    /// 1-based line the match starts on.
    pub line: usize,
    /// Byte offset of the match.
    pub start: usize,
    /// Length of the match in bytes.
    pub length: usize,
    /// Matched text.
    pub value: String,
    /// Named groups that participated in the match.
    pub groups: Vec<TesterGroup>,
}

impl fmt::Display for TesterMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} line {} @{}+{}: {:?}",
            self.index, self.line, self.start, self.length, self.value
        )?;
        for group in &self.groups {
            write!(f, " {}={:?}", group.name, group.value)?;
        }
        Ok(())
    }
}

/// Lists every match of a pattern in a text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTester {
    options: RegexOptions,
}

impl RegexTester {
    /// Creates a tester using `options` for every pattern.
    #[must_use]
    pub const fn new(options: RegexOptions) -> Self {
        Self { options }
    }

    /// Runs `pattern` over `text`.
    ///
    /// Empty text yields no matches.
    ///
    /// # Errors
    ///
    /// Fails when the pattern does not compile or the options are not
    /// supported for listing every match.
    pub fn test(&self, pattern: &str, text: &str) -> Result<Vec<TesterMatch>, ScanError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let mut inspection = Inspection::from_text(text);
        inspection.set_settings(InspectionSettings {
            regex_options: self.options,
            track_lines: true,
            ..InspectionSettings::default()
        })?;

        let handles = inspection.find_all(pattern)?;
        let mut matches = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let segment = inspection.segment(handle)?;
            let (start, groups) = segment.captures().map_or((0, Vec::new()), |captures| {
                let groups = captures
                    .groups()
                    .filter_map(|(_, group)| {
                        group.name().map(|name| TesterGroup {
                            name: name.to_owned(),
                            value: group.text().to_owned(),
                        })
                    })
                    .collect();
                (captures.range().start, groups)
            });
            matches.push(TesterMatch {
                index,
                line: inspection.line_index(handle)?,
                start,
                length: segment.text().len(),
                value: segment.text().to_owned(),
                groups,
            });
        }
        inspection.cancel();
        Ok(matches)
    }
}

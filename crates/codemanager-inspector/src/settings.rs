//! Per-session regex and bookkeeping options.

use regex::{Regex, RegexBuilder};

use crate::error::InspectionError;

/// Flags applied when compiling query patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexOptions {
    /// Match letters regardless of case.
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,
    /// Search from the end of the document. `find` then yields the last match;
    /// `find_all` rejects the option.
    pub right_to_left: bool,
}

/// Options of one inspection session.
///
/// Settings can only be replaced while the session has no active
/// decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectionSettings {
    /// Regex flags for every query.
    pub regex_options: RegexOptions,
    /// Upper bound, in bytes, on the size of a compiled pattern. Bounds the
    /// work a pathological pattern can cause; `None` keeps the regex default.
    pub size_limit: Option<usize>,
    /// Enables [`Inspection::line_index`](crate::Inspection::line_index).
    pub track_lines: bool,
}

impl InspectionSettings {
    /// Default settings with line tracking enabled.
    #[must_use]
    pub fn with_line_tracking() -> Self {
        Self {
            track_lines: true,
            ..Self::default()
        }
    }

    pub(crate) fn compile(&self, pattern: &str) -> Result<Regex, InspectionError> {
        let options = self.regex_options;
        let mut builder = RegexBuilder::new(pattern);
        builder
            .case_insensitive(options.case_insensitive)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.dot_matches_new_line)
            .ignore_whitespace(options.ignore_whitespace);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        builder
            .build()
            .map_err(|error| InspectionError::invalid_pattern(pattern, error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_reach_the_compiled_pattern() {
        let settings = InspectionSettings {
            regex_options: RegexOptions {
                case_insensitive: true,
                ..RegexOptions::default()
            },
            ..InspectionSettings::default()
        };
        let regex = settings.compile("dear").expect("compile");
        assert!(regex.is_match("Hey DEAR"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = InspectionSettings::default()
            .compile("(unclosed")
            .expect_err("invalid");
        assert!(matches!(err, InspectionError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn size_limit_rejects_large_patterns() {
        let settings = InspectionSettings {
            size_limit: Some(16),
            ..InspectionSettings::default()
        };
        assert!(settings.compile(r"\w{50}").is_err());
    }
}

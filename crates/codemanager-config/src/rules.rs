//! Clean-code rules and the regexes they reference.
//!
//! Rules never embed patterns. They point into [`Settings::regexes`] by index,
//! so one regex can serve several rules.
//!
//! [`Settings::regexes`]: crate::Settings::regexes

use serde::{Deserialize, Serialize};

/// Stable identifier of a rule; `0` means not yet assigned.
pub type RuleId = u32;

/// A regular expression with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRegex {
    /// Name shown in reports and pickers.
    pub name: String,
    /// Pattern source.
    pub regex: String,
}

impl NamedRegex {
    /// Creates a named regex.
    #[must_use]
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
        }
    }
}

/// Every match of the regex is a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwantedCode {
    /// Rule identifier.
    #[serde(default)]
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Index of the regex to search for.
    pub regex_index: Option<usize>,
    /// Explanation shown with each violation.
    pub description: String,
}

/// The text right before every match must be a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDocumentation {
    /// Rule identifier.
    #[serde(default)]
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Index of the regex locating code that needs documentation.
    pub regex_index: Option<usize>,
    /// Explanation shown with each violation.
    pub description: String,
}

/// A named group of every match must itself match a second regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeGuideline {
    /// Rule identifier.
    #[serde(default)]
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Index of the regex locating the code to check.
    pub search_regex_index: Option<usize>,
    /// Group of the search match whose value is checked.
    pub group_name: String,
    /// Index of the regex the group value must match.
    pub match_regex_index: Option<usize>,
    /// Explanation shown with each violation.
    pub description: String,
}

/// Any of the three rule kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// See [`UnwantedCode`].
    UnwantedCode(UnwantedCode),
    /// See [`CodeDocumentation`].
    Documentation(CodeDocumentation),
    /// See [`CodeGuideline`].
    Guideline(CodeGuideline),
}

impl Rule {
    /// Rule identifier.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        match self {
            Self::UnwantedCode(rule) => rule.id,
            Self::Documentation(rule) => rule.id,
            Self::Guideline(rule) => rule.id,
        }
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::UnwantedCode(rule) => &rule.name,
            Self::Documentation(rule) => &rule.name,
            Self::Guideline(rule) => &rule.name,
        }
    }

    /// Explanation shown with each violation.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::UnwantedCode(rule) => &rule.description,
            Self::Documentation(rule) => &rule.description,
            Self::Guideline(rule) => &rule.description,
        }
    }

    /// Index of the regex the rule searches with.
    #[must_use]
    pub const fn search_index(&self) -> Option<usize> {
        match self {
            Self::UnwantedCode(rule) => rule.regex_index,
            Self::Documentation(rule) => rule.regex_index,
            Self::Guideline(rule) => rule.search_regex_index,
        }
    }

    /// Whether every index is set and below `regex_count`, and a guideline
    /// names its group.
    #[must_use]
    pub fn is_valid(&self, regex_count: usize) -> bool {
        let in_range = |index: Option<usize>| index.is_some_and(|value| value < regex_count);
        match self {
            Self::UnwantedCode(rule) => in_range(rule.regex_index),
            Self::Documentation(rule) => in_range(rule.regex_index),
            Self::Guideline(rule) => {
                in_range(rule.search_regex_index)
                    && in_range(rule.match_regex_index)
                    && !rule.group_name.trim().is_empty()
            }
        }
    }
}

//! Rule violations found in scripts.

use std::fmt;
use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

/// Which kind of rule a violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViolationKind {
    /// Code matched an unwanted-code rule.
    UnwantedCode,
    /// Code required documentation that was missing.
    Documentation,
    /// A name broke a code guideline.
    Guideline,
}

/// One clean-code violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    source: PathBuf,
    line: usize,
    rule: String,
    description: String,
    message: String,
    kind: ViolationKind,
}

impl Violation {
    /// Creates a violation; the message is derived from the kind, the file
    /// name and the line.
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        path: impl Into<PathBuf>,
        line: usize,
        rule: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let source = path.into();
        let file = source
            .file_name()
            .map_or_else(|| source.display().to_string(), |name| name.to_string_lossy().into_owned());
        let message = match kind {
            ViolationKind::UnwantedCode => format!("Unwanted Code found in: {file}: {line}"),
            ViolationKind::Documentation => format!("Code not documented in: {file}: {line}"),
            ViolationKind::Guideline => format!("Codeguideline violation in: {file}: {line}"),
        };
        Self {
            source,
            line,
            rule: rule.into(),
            description: description.into(),
            message,
            kind,
        }
    }

    /// File containing the violation.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// 1-based line of the offending match.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Name of the broken rule.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Rule description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Report message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Kind of the broken rule.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {} - {}",
            self.source.display(),
            self.line,
            self.kind,
            self.description,
            self.message
        )
    }
}

//! Holds the latest scan's violations and renders them as a report.

use std::collections::BTreeMap;

use crate::violation::{Violation, ViolationKind};

/// Collects the violations of the latest scan for display.
#[derive(Debug, Default)]
pub struct Console {
    violations: Vec<Violation>,
}

impl Console {
    /// Creates an empty console.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends violations.
    pub fn collect(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    /// Drops every collected violation.
    pub fn clear(&mut self) {
        self.violations.clear();
    }

    /// Number of collected violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether nothing was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every collected violation, in scan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.kind() == kind)
    }

    /// Number of violations per kind.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// One text line per violation.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Console {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

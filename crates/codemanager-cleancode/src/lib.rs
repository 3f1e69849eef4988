//! Regex based clean-code checks for C# script folders.
//!
//! [`FolderScanner`] opens every script of a folder read-only through the
//! inspection registry, runs the rules assigned to the folder and reports a
//! [`Violation`] per offending match. [`Console`] collects the violations of
//! a scan for display, and [`RegexTester`] shows what a pattern matches before
//! it is used in a rule.

mod console;
mod error;
mod scanner;
mod tester;
mod violation;

pub use console::Console;
pub use error::ScanError;
pub use scanner::FolderScanner;
pub use tester::{RegexTester, TesterGroup, TesterMatch};
pub use violation::{Violation, ViolationKind};

#[cfg(test)]
mod tests;

//! Settings shared by the CodeManager tools.
//!
//! [`Settings`] holds everything the user configures: script folders and the
//! clean-code rules assigned to them, template placeholders, the named regexes
//! rules refer to by index, and the documentation regex. Settings persist as
//! pretty-printed JSON.
//!
//! [`Settings::default`] reproduces the stock rule set: no empty code blocks,
//! capitalised method names, lowercase private fields and documented classes.

mod defaults;
mod error;
mod logging;
mod rules;
mod settings;

pub use defaults::{DEFAULT_LOG_FILTER, DEFAULT_SETTINGS_FILE, DEFAULT_TEMPLATE_FOLDER, patterns};
pub use error::SettingsError;
pub use logging::{LogFormat, LogFormatParseError};
pub use rules::{CodeDocumentation, CodeGuideline, NamedRegex, Rule, RuleId, UnwantedCode};
pub use settings::{Placeholder, ScriptFolder, Settings, is_valid_regex};

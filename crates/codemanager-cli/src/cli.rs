//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use codemanager_config::{DEFAULT_LOG_FILTER, DEFAULT_SETTINGS_FILE, LogFormat};

/// Script templates and clean-code checks for C# projects.
#[derive(Parser, Debug)]
#[command(name = "codemanager", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Settings file to read.
    #[arg(
        long,
        env = "CODEMANAGER_SETTINGS",
        value_name = "PATH",
        default_value = DEFAULT_SETTINGS_FILE
    )]
    pub(crate) settings: PathBuf,
    /// Tracing filter expression.
    #[arg(long, env = "CODEMANAGER_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub(crate) log_filter: String,
    /// Log output format (`json` or `compact`).
    #[arg(long, env = "CODEMANAGER_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// CodeManager subcommands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Writes the default settings file.
    Init,
    /// Scans script folders for clean-code violations.
    ///
    /// Without arguments every configured folder is scanned. An argument
    /// names a configured folder, or else a directory checked with every
    /// rule, subdirectories included.
    Scan {
        /// Folder names or paths.
        #[arg(value_name = "FOLDER")]
        folders: Vec<String>,
    },
    /// Lists every match of a pattern in a text.
    TestRegex {
        /// Pattern to try.
        pattern: String,
        /// Text to search.
        text: String,
        /// Match case-insensitively.
        #[arg(long)]
        ignore_case: bool,
        /// Let `^` and `$` match at line boundaries.
        #[arg(long)]
        multi_line: bool,
    },
    /// Lists the templates in the template folder.
    Templates,
    /// Creates a script template with the stock contents.
    NewTemplate {
        /// Template file to create.
        path: PathBuf,
    },
    /// Creates a script from a template.
    NewScript {
        /// Script and class name.
        name: String,
        /// Template name in the template folder, or a template file.
        #[arg(long)]
        template: String,
        /// Folder the script is created in.
        #[arg(long, default_value = ".")]
        folder: PathBuf,
    },
}

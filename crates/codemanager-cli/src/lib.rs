//! Command-line runtime for CodeManager.
//!
//! [`run`] parses the arguments, installs telemetry and dispatches to the
//! subcommand. Output goes to the writers it is given, so tests can capture
//! it; diagnostics go to the tracing subscriber on standard error.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod errors;
mod telemetry;

use cli::Cli;
use errors::AppError;

/// Exit status for failed commands, kept apart from "violations found".
const COMMAND_FAILED: u8 = 2;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if error.use_stderr() => {
            let _ = write!(stderr, "{}", AppError::CliUsage(error));
            return ExitCode::from(COMMAND_FAILED);
        }
        Err(error) => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
    };

    let result = telemetry::initialise(&cli.log_filter, cli.log_format)
        .map_err(AppError::from)
        .and_then(|()| commands::execute(&cli.command, &cli.settings, stdout));

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            let _ = writeln!(stderr, "codemanager: {error}");
            ExitCode::from(COMMAND_FAILED)
        }
    }
}

#[cfg(test)]
mod tests;

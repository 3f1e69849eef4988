//! Error type for the CLI runtime.

use std::io;

use codemanager_cleancode::ScanError;
use codemanager_config::SettingsError;
use codemanager_templates::TemplateError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

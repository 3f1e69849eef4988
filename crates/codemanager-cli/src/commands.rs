//! Subcommand execution.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use codemanager_cleancode::{Console, FolderScanner, RegexTester};
use codemanager_config::{Rule, ScriptFolder, Settings};
use codemanager_inspector::{Inspector, RegexOptions};
use codemanager_templates::{ScriptTemplate, create_script, create_template, discover};
use tracing::debug;

use crate::cli::CliCommand;
use crate::errors::AppError;

/// Exit status of a scan that found violations.
const VIOLATIONS_FOUND: u8 = 1;

pub(crate) fn execute<W: Write>(
    command: &CliCommand,
    settings_path: &Path,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    debug!(?command, settings = %settings_path.display(), "running command");
    match command {
        CliCommand::Init => init(settings_path, stdout),
        CliCommand::Scan { folders } => scan(settings_path, folders, stdout),
        CliCommand::TestRegex {
            pattern,
            text,
            ignore_case,
            multi_line,
        } => {
            let options = RegexOptions {
                case_insensitive: *ignore_case,
                multi_line: *multi_line,
                ..RegexOptions::default()
            };
            test_regex(options, pattern, text, stdout)
        }
        CliCommand::Templates => list_templates(settings_path, stdout),
        CliCommand::NewTemplate { path } => {
            let template = create_template(path)?;
            writeln!(stdout, "created template {}", template.path().display())?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::NewScript {
            name,
            template,
            folder,
        } => new_script(settings_path, name, template, folder, stdout),
    }
}

fn init<W: Write>(settings_path: &Path, stdout: &mut W) -> Result<ExitCode, AppError> {
    Settings::default().create(settings_path)?;
    writeln!(stdout, "created settings {}", settings_path.display())?;
    Ok(ExitCode::SUCCESS)
}

fn scan<W: Write>(
    settings_path: &Path,
    folders: &[String],
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let settings = Settings::load_or_default(settings_path)?;
    let targets: Vec<ScriptFolder> = if folders.is_empty() {
        settings.script_folders.clone()
    } else {
        folders
            .iter()
            .map(|folder| scan_target(&settings, folder))
            .collect()
    };
    if targets.is_empty() {
        writeln!(stdout, "no script folders to scan")?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector)?;
    let mut console = Console::new();
    for folder in &targets {
        console.collect(scanner.scan_folder(folder)?);
    }

    for line in console.render() {
        writeln!(stdout, "{line}")?;
    }
    writeln!(
        stdout,
        "{} violation(s) in {} folder(s)",
        console.len(),
        targets.len()
    )?;
    Ok(if console.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(VIOLATIONS_FOUND)
    })
}

/// A configured folder by name, or an ad-hoc folder checked with every rule.
fn scan_target(settings: &Settings, folder: &str) -> ScriptFolder {
    settings
        .script_folder(folder)
        .cloned()
        .unwrap_or_else(|| ScriptFolder {
            name: folder.to_owned(),
            path: PathBuf::from(folder),
            include_subdirectories: true,
            rules: settings.valid_rules().iter().map(Rule::id).collect(),
        })
}

fn test_regex<W: Write>(
    options: RegexOptions,
    pattern: &str,
    text: &str,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let matches = RegexTester::new(options).test(pattern, text)?;
    if matches.is_empty() {
        writeln!(stdout, "no matches")?;
    }
    for found in &matches {
        writeln!(stdout, "{found}")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn list_templates<W: Write>(settings_path: &Path, stdout: &mut W) -> Result<ExitCode, AppError> {
    let settings = Settings::load_or_default(settings_path)?;
    for template in discover(&settings.template_folder)? {
        writeln!(stdout, "{}\t{}", template.name(), template.path().display())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn new_script<W: Write>(
    settings_path: &Path,
    name: &str,
    template: &str,
    folder: &Path,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let settings = Settings::load_or_default(settings_path)?;
    let source = find_template(&settings, template)?;
    let script = create_script(name, &source, folder, &settings.placeholders)?;
    writeln!(stdout, "created script {}", script.display())?;
    Ok(ExitCode::SUCCESS)
}

/// Looks `template` up by name in the template folder, else treats it as a path.
fn find_template(settings: &Settings, template: &str) -> Result<ScriptTemplate, AppError> {
    if settings.template_folder.is_dir()
        && let Some(found) = discover(&settings.template_folder)?
            .into_iter()
            .find(|candidate| candidate.name() == template)
    {
        return Ok(found);
    }
    Ok(ScriptTemplate::from_path(template)?)
}

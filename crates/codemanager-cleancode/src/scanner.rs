//! Scanning script folders for clean-code violations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use codemanager_config::{CodeDocumentation, CodeGuideline, Rule, ScriptFolder, Settings, UnwantedCode};
use codemanager_inspector::{Inspection, InspectionMode, InspectionSettings, Inspector};
use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::violation::{Violation, ViolationKind};

const SCRIPT_EXTENSION: &str = "cs";

/// A match found while scanning one file.
///
/// Only plain data is cached: the read-only session commits its previous
/// decomposition on every query, so segment handles would not outlive the
/// next search.
#[derive(Debug, Clone)]
struct FoundMatch {
    line: usize,
    named: HashMap<String, String>,
    preceding: Option<String>,
}

/// Runs clean-code rules over script folders.
pub struct FolderScanner<'a> {
    settings: &'a Settings,
    inspector: &'a mut Inspector,
    documentation: Regex,
    compiled: HashMap<usize, Regex>,
}

impl<'a> FolderScanner<'a> {
    /// Creates a scanner over `settings`, opening files through `inspector`.
    ///
    /// # Errors
    ///
    /// Fails when the documentation regex does not compile.
    pub fn new(settings: &'a Settings, inspector: &'a mut Inspector) -> Result<Self, ScanError> {
        let documentation =
            Regex::new(&settings.documentation_regex).map_err(|err| ScanError::InvalidRegex {
                name: "documentation".to_owned(),
                message: err.to_string(),
            })?;
        Ok(Self {
            settings,
            inspector,
            documentation,
            compiled: HashMap::new(),
        })
    }

    /// Scans every configured script folder.
    ///
    /// # Errors
    ///
    /// Fails when a folder cannot be listed.
    pub fn scan_all(&mut self) -> Result<Vec<Violation>, ScanError> {
        let settings = self.settings;
        let mut violations = Vec::new();
        for folder in &settings.script_folders {
            violations.extend(self.scan_folder(folder)?);
        }
        Ok(violations)
    }

    /// Scans the scripts of one folder against the rules assigned to it.
    ///
    /// Folders without rules are skipped. Files that cannot be opened are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails when the folder cannot be listed.
    pub fn scan_folder(&mut self, folder: &ScriptFolder) -> Result<Vec<Violation>, ScanError> {
        let rules = self.folder_rules(folder);
        if rules.is_empty() {
            debug!(folder = %folder.name, "no clean-code rules assigned, skipping");
            return Ok(Vec::new());
        }

        let scripts = list_scripts(&folder.path, folder.include_subdirectories)?;
        let mut violations = Vec::new();
        for script in &scripts {
            violations.extend(self.scan_file(script, &rules)?);
        }
        info!(
            folder = %folder.name,
            scripts = scripts.len(),
            violations = violations.len(),
            "scanned script folder"
        );
        Ok(violations)
    }

    /// Scans one file against `rules`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures other than a file that cannot be opened.
    pub fn scan_file(&mut self, path: &Path, rules: &[Rule]) -> Result<Vec<Violation>, ScanError> {
        let mut inspection = match self.inspector.inspect_file(path, InspectionMode::Read) {
            Ok(inspection) => inspection,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping script");
                return Ok(Vec::new());
            }
        };

        let result = self.check_rules(&mut inspection, path, rules);
        self.inspector.close(&mut inspection)?;
        result
    }

    fn check_rules(
        &mut self,
        inspection: &mut Inspection,
        path: &Path,
        rules: &[Rule],
    ) -> Result<Vec<Violation>, ScanError> {
        inspection.set_settings(InspectionSettings::with_line_tracking())?;
        let mut searched: HashMap<usize, Vec<FoundMatch>> = HashMap::new();
        let mut violations = Vec::new();

        for rule in rules {
            let Some(index) = rule.search_index() else {
                continue;
            };
            if !searched.contains_key(&index) {
                let Some(found) = self.search(inspection, index)? else {
                    continue;
                };
                searched.insert(index, found);
            }
            let Some(found) = searched.get(&index) else {
                continue;
            };
            match rule {
                Rule::UnwantedCode(unwanted) => {
                    violations.extend(unwanted_code(unwanted, path, found));
                }
                Rule::Documentation(documentation) => {
                    violations.extend(self.undocumented(documentation, path, found));
                }
                Rule::Guideline(guideline) => {
                    violations.extend(self.guideline(guideline, path, found)?);
                }
            }
        }
        Ok(violations)
    }

    /// Runs regex `index` over the file; `None` when the pattern is unusable.
    fn search(
        &self,
        inspection: &mut Inspection,
        index: usize,
    ) -> Result<Option<Vec<FoundMatch>>, ScanError> {
        let Some(pattern) = self.settings.regex(index) else {
            return Ok(None);
        };
        let handles = match inspection.find_all(pattern) {
            Ok(handles) => handles,
            Err(err) => {
                warn!(index, error = %err, "skipping rules using an unusable regex");
                return Ok(None);
            }
        };

        let mut found = Vec::with_capacity(handles.len());
        for handle in handles {
            let named: HashMap<String, String> = inspection
                .segment(handle)?
                .captures()
                .map(|captures| {
                    captures
                        .groups()
                        .filter_map(|(_, group)| {
                            group
                                .name()
                                .map(|name| (name.to_owned(), group.text().to_owned()))
                        })
                        .collect()
                })
                .unwrap_or_default();
            let preceding = inspection
                .previous(handle)?
                .map(|prev| inspection.text(prev).map(str::to_owned))
                .transpose()?;
            found.push(FoundMatch {
                line: inspection.line_index(handle)?,
                named,
                preceding,
            });
        }
        Ok(Some(found))
    }

    fn undocumented(
        &self,
        rule: &CodeDocumentation,
        path: &Path,
        found: &[FoundMatch],
    ) -> Vec<Violation> {
        found
            .iter()
            .filter(|hit| {
                hit.preceding
                    .as_deref()
                    .is_none_or(|text| !self.documentation.is_match(text))
            })
            .map(|hit| {
                Violation::new(
                    ViolationKind::Documentation,
                    path,
                    hit.line,
                    &rule.name,
                    &rule.description,
                )
            })
            .collect()
    }

    fn guideline(
        &mut self,
        rule: &CodeGuideline,
        path: &Path,
        found: &[FoundMatch],
    ) -> Result<Vec<Violation>, ScanError> {
        let Some(index) = rule.match_regex_index else {
            return Ok(Vec::new());
        };
        let check = self.compiled_regex(index)?;
        Ok(found
            .iter()
            .filter(|hit| {
                let value = hit.named.get(&rule.group_name).map_or("", String::as_str);
                !check.is_match(value)
            })
            .map(|hit| {
                Violation::new(
                    ViolationKind::Guideline,
                    path,
                    hit.line,
                    &rule.name,
                    &rule.description,
                )
            })
            .collect())
    }

    fn compiled_regex(&mut self, index: usize) -> Result<&Regex, ScanError> {
        if !self.compiled.contains_key(&index) {
            let named = self.settings.regexes.get(index);
            let pattern = named.map_or("", |entry| entry.regex.as_str());
            let regex = Regex::new(pattern).map_err(|err| ScanError::InvalidRegex {
                name: named.map_or_else(|| index.to_string(), |entry| entry.name.clone()),
                message: err.to_string(),
            })?;
            self.compiled.insert(index, regex);
        }
        self.compiled.get(&index).ok_or_else(|| ScanError::InvalidRegex {
            name: index.to_string(),
            message: "regex cache miss".to_owned(),
        })
    }

    fn folder_rules(&self, folder: &ScriptFolder) -> Vec<Rule> {
        folder
            .rules
            .iter()
            .filter_map(|id| {
                let rule = self.settings.rule(*id);
                if rule.is_none() {
                    warn!(folder = %folder.name, rule = id, "unknown or invalid rule assigned to folder");
                }
                rule
            })
            .collect()
    }
}

fn unwanted_code(rule: &UnwantedCode, path: &Path, found: &[FoundMatch]) -> Vec<Violation> {
    found
        .iter()
        .map(|hit| {
            Violation::new(
                ViolationKind::UnwantedCode,
                path,
                hit.line,
                &rule.name,
                &rule.description,
            )
        })
        .collect()
}

/// Lists `*.cs` files under `folder` in path order, descending when
/// `recursive`. Symlinked directories are not entered.
fn list_scripts(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let mut walker = WalkDir::new(folder)
        .follow_links(false)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut scripts = Vec::new();
    for item in walker {
        let entry = item.map_err(|source| ScanError::ReadDir {
            path: source.path().unwrap_or(folder).to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
        {
            scripts.push(entry.into_path());
        }
    }
    Ok(scripts)
}

//! The persisted settings model and its JSON file handling.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::defaults::{
    default_code_documentation, default_code_guidelines, default_documentation_regex,
    default_regexes, default_template_folder, default_unwanted_code,
};
use crate::error::SettingsError;
use crate::rules::{CodeDocumentation, CodeGuideline, NamedRegex, Rule, RuleId, UnwantedCode};

/// A folder of scripts, the target of new scripts and of clean-code scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFolder {
    /// Display name.
    pub name: String,
    /// Folder location.
    pub path: PathBuf,
    /// Whether scans descend into subdirectories.
    #[serde(default)]
    pub include_subdirectories: bool,
    /// Identifiers of the rules checked in this folder.
    #[serde(default)]
    pub rules: Vec<RuleId>,
}

/// A user-defined `%Name%` substitution for script templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Name between the percent signs.
    pub name: String,
    /// Replacement text.
    pub value: String,
}

impl Placeholder {
    /// Creates a placeholder.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything the user configures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder holding script templates.
    pub template_folder: PathBuf,
    /// Script folders.
    pub script_folders: Vec<ScriptFolder>,
    /// Template placeholders.
    pub placeholders: Vec<Placeholder>,
    /// Regexes referenced by rules.
    pub regexes: Vec<NamedRegex>,
    /// Pattern the text before documented code must match.
    pub documentation_regex: String,
    /// Unwanted-code rules.
    pub unwanted_code: Vec<UnwantedCode>,
    /// Code-guideline rules.
    pub code_guidelines: Vec<CodeGuideline>,
    /// Documentation rules.
    pub code_documentation: Vec<CodeDocumentation>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            template_folder: default_template_folder(),
            script_folders: Vec::new(),
            placeholders: Vec::new(),
            regexes: default_regexes(),
            documentation_regex: default_documentation_regex(),
            unwanted_code: default_unwanted_code(),
            code_guidelines: default_code_guidelines(),
            code_documentation: default_code_documentation(),
        };
        settings.assign_rule_ids();
        settings
    }
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// Rules without an identifier receive one.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid settings JSON.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|err| SettingsError::read(path, err))?;
        let mut settings: Self =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.assign_rule_ids();
        debug!(path = %path.display(), rules = settings.rules().count(), "loaded settings");
        Ok(settings)
    }

    /// Loads settings from `path`, or returns the defaults when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Fails when an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes the settings as pretty JSON, atomically replacing any existing
    /// file.
    ///
    /// # Errors
    ///
    /// Fails when serialisation or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let temp = self.write_temp(path)?;
        temp.persist(path)
            .map_err(|err| SettingsError::write(path, err.error))?;
        Ok(())
    }

    /// Writes the settings as pretty JSON to a file that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::AlreadyExists`] when the file exists, and fails
    /// when serialisation or the write fails.
    pub fn create(&self, path: &Path) -> Result<(), SettingsError> {
        let temp = self.write_temp(path)?;
        temp.persist_noclobber(path).map_err(|err| {
            if err.error.kind() == io::ErrorKind::AlreadyExists {
                SettingsError::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                SettingsError::write(path, err.error)
            }
        })?;
        Ok(())
    }

    /// Writes the JSON to a temporary file next to `path`.
    fn write_temp(&self, path: &Path) -> Result<NamedTempFile, SettingsError> {
        let json = self.to_json()?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp =
            NamedTempFile::new_in(parent).map_err(|err| SettingsError::write(path, err))?;
        temp.write_all(json.as_bytes())
            .map_err(|err| SettingsError::write(path, err))?;
        Ok(temp)
    }

    fn to_json(&self) -> Result<String, SettingsError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Gives every rule with identifier `0` the next free identifier.
    ///
    /// Identifiers already assigned are kept, so folder rule lists stay
    /// valid across edits.
    pub fn assign_rule_ids(&mut self) {
        let mut next = self.rules().map(|rule| rule.id()).max().unwrap_or(0);
        let mut assign = |id: &mut RuleId| {
            if *id == 0 {
                next += 1;
                *id = next;
            }
        };
        self.unwanted_code.iter_mut().for_each(|rule| assign(&mut rule.id));
        self.code_guidelines
            .iter_mut()
            .for_each(|rule| assign(&mut rule.id));
        self.code_documentation
            .iter_mut()
            .for_each(|rule| assign(&mut rule.id));
    }

    /// Every rule, valid or not.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        let unwanted = self.unwanted_code.iter().cloned().map(Rule::UnwantedCode);
        let guidelines = self.code_guidelines.iter().cloned().map(Rule::Guideline);
        let documentation = self
            .code_documentation
            .iter()
            .cloned()
            .map(Rule::Documentation);
        unwanted.chain(guidelines).chain(documentation)
    }

    /// Rules that reference existing regexes; invalid ones are logged and
    /// skipped.
    #[must_use]
    pub fn valid_rules(&self) -> Vec<Rule> {
        let regex_count = self.regexes.len();
        self.rules()
            .filter(|rule| {
                let valid = rule.is_valid(regex_count);
                if !valid {
                    warn!(rule = rule.name(), id = rule.id(), "skipping invalid clean-code rule");
                }
                valid
            })
            .collect()
    }

    /// Valid rule with the given identifier.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<Rule> {
        self.rules()
            .find(|rule| rule.id() == id)
            .filter(|rule| rule.is_valid(self.regexes.len()))
    }

    /// Pattern source of the regex at `index`.
    #[must_use]
    pub fn regex(&self, index: usize) -> Option<&str> {
        self.regexes.get(index).map(|named| named.regex.as_str())
    }

    /// Script folder with the given name.
    #[must_use]
    pub fn script_folder(&self, name: &str) -> Option<&ScriptFolder> {
        self.script_folders.iter().find(|folder| folder.name == name)
    }
}

/// Whether `pattern` is non-empty and compiles.
#[must_use]
pub fn is_valid_regex(pattern: &str) -> bool {
    !pattern.is_empty() && Regex::new(pattern).is_ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_number_rules_from_one() {
        let settings = Settings::default();
        let ids: Vec<RuleId> = settings.rules().map(|rule| rule.id()).collect();

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(settings.valid_rules().len(), 4);
        assert_eq!(settings.regexes.len(), 7);
    }

    #[test]
    fn assigned_ids_are_kept() {
        let mut settings = Settings::default();
        settings.unwanted_code.push(UnwantedCode {
            id: 0,
            name: "Debug.Log".to_owned(),
            regex_index: Some(0),
            description: "No logging left behind".to_owned(),
        });
        settings.assign_rule_ids();

        let ids: Vec<RuleId> = settings.rules().map(|rule| rule.id()).collect();
        assert_eq!(ids, vec![1, 5, 2, 3, 4]);
    }

    #[test]
    fn rule_lookup_skips_invalid_rules() {
        let mut settings = Settings::default();
        settings.code_guidelines[0].match_regex_index = Some(99);

        assert!(settings.rule(2).is_none());
        assert!(settings.rule(1).is_some());
        assert_eq!(settings.valid_rules().len(), 3);
    }

    #[test]
    fn settings_survive_a_save_and_load() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("codemanager.json");
        let mut settings = Settings::default();
        settings.script_folders.push(ScriptFolder {
            name: "Scripts".to_owned(),
            path: PathBuf::from("Assets/Scripts"),
            include_subdirectories: true,
            rules: vec![1, 4],
        });
        settings.placeholders.push(Placeholder::new("Author", "Morgan"));

        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");

        assert_eq!(loaded, settings);
        assert!(loaded.script_folder("Scripts").is_some());
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("codemanager.json");
        fs::write(&path, r#"{ "placeholders": [{ "name": "Company", "value": "Acme" }] }"#)
            .expect("write");

        let loaded = Settings::load(&path).expect("load");
        assert_eq!(loaded.placeholders, vec![Placeholder::new("Company", "Acme")]);
        assert_eq!(loaded.regexes, Settings::default().regexes);
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("codemanager.json");
        Settings::default().create(&path).expect("first create");

        assert!(matches!(
            Settings::default().create(&path),
            Err(SettingsError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn save_replaces_files_without_leftovers() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("codemanager.json");
        fs::write(&path, "{ not json").expect("write");

        Settings::default().save(&path).expect("save");

        assert_eq!(Settings::load(&path).expect("load"), Settings::default());
        let entries = fs::read_dir(dir.path()).expect("list").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let loaded =
            Settings::load_or_default(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn malformed_files_are_reported() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("codemanager.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(
            Settings::load_or_default(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[rstest]
    #[case("", false)]
    #[case("(", false)]
    #[case(r"\w+", true)]
    fn regex_validity(#[case] pattern: &str, #[case] valid: bool) {
        assert_eq!(is_valid_regex(pattern), valid);
    }
}

//! Script template files: discovery and the stock template.

use std::ffi::OsStr;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::TemplateError;

/// Extension of template files.
pub const TEMPLATE_EXTENSION: &str = "txt";

/// Contents of a freshly created template: an empty `MonoBehaviour`.
pub const STOCK_TEMPLATE: &str = "\
using UnityEngine;
using System.Collections;

public class %ScriptName% : MonoBehaviour
{

\t// Use this for initialization
\tvoid Start () {
\t
\t}


\t// Update is called once per frame
\tvoid Update () {

\t}
}
";

/// A template file a script can be created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    name: String,
    path: PathBuf,
}

impl ScriptTemplate {
    /// Wraps the template at `file`; its name is the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotATemplate`] unless `file` has a `.txt`
    /// extension and a UTF-8 stem.
    pub fn from_path(file: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let path = file.into();
        let is_template = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
        let Some(stem) = path
            .file_stem()
            .and_then(OsStr::to_str)
            .filter(|_| is_template)
        else {
            return Err(TemplateError::NotATemplate { path });
        };
        Ok(Self {
            name: stem.to_owned(),
            path,
        })
    }

    /// Template name, used for the `TemplateName` placeholder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the template text.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read.
    pub fn load(&self) -> Result<String, TemplateError> {
        fs::read_to_string(&self.path).map_err(|err| TemplateError::read(&self.path, err))
    }
}

/// Lists the templates in `folder`, sorted by name.
///
/// # Errors
///
/// Fails when the folder cannot be listed.
pub fn discover(folder: &Path) -> Result<Vec<ScriptTemplate>, TemplateError> {
    let entries = fs::read_dir(folder).map_err(|err| TemplateError::read(folder, err))?;
    let mut templates = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| TemplateError::read(folder, err))?.path();
        if path.is_file()
            && let Ok(template) = ScriptTemplate::from_path(path)
        {
            templates.push(template);
        }
    }
    templates.sort_by(|left, right| left.name.cmp(&right.name));
    debug!(folder = %folder.display(), count = templates.len(), "discovered script templates");
    Ok(templates)
}

/// Writes [`STOCK_TEMPLATE`] to `path`.
///
/// # Errors
///
/// Returns [`TemplateError::NotATemplate`] for a path without a `.txt`
/// extension, [`TemplateError::AlreadyExists`] when `path` exists and
/// [`TemplateError::Write`] when it cannot be written.
pub fn create_template(path: &Path) -> Result<ScriptTemplate, TemplateError> {
    let template = ScriptTemplate::from_path(path)?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent).map_err(|err| TemplateError::write(path, err))?;
    temp.write_all(STOCK_TEMPLATE.as_bytes())
        .map_err(|err| TemplateError::write(path, err))?;
    temp.persist_noclobber(path)
        .map_err(|err| TemplateError::create(path, err.error))?;
    info!(path = %path.display(), "created script template");
    Ok(template)
}

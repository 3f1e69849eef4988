//! Creating scripts from templates.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use codemanager_config::Placeholder;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::TemplateError;
use crate::placeholder::{render, resolve_placeholders};
use crate::template::ScriptTemplate;

/// Extension of created scripts.
pub const SCRIPT_EXTENSION: &str = "cs";

/// Creates `{folder}/{script_name}.cs` from `template`.
///
/// Nothing is written unless every placeholder resolves. The script is
/// written to a temporary file in `folder` and moved into place, so a failed
/// write leaves no partial script. Returns the path of the new script.
///
/// # Errors
///
/// Fails when the name is not a plain file name, the script already exists,
/// the template cannot be read, a placeholder has no value, or the script
/// cannot be written.
pub fn create_script(
    script_name: &str,
    template: &ScriptTemplate,
    folder: &Path,
    placeholders: &[Placeholder],
) -> Result<PathBuf, TemplateError> {
    if !is_plain_name(script_name) {
        return Err(TemplateError::InvalidScriptName {
            name: script_name.to_owned(),
        });
    }
    let target = folder.join(format!("{script_name}.{SCRIPT_EXTENSION}"));
    if target.exists() {
        return Err(TemplateError::AlreadyExists { path: target });
    }

    let source = template.load()?;
    let values = resolve_placeholders(placeholders, script_name, template.name());
    let rendered = render(&source, &values)?;

    let mut temp =
        NamedTempFile::new_in(folder).map_err(|err| TemplateError::write(&target, err))?;
    temp.write_all(rendered.as_bytes())
        .and_then(|()| temp.write_all(b"\n"))
        .map_err(|err| TemplateError::write(&target, err))?;
    temp.persist_noclobber(&target)
        .map_err(|err| TemplateError::create(&target, err.error))?;
    info!(script = %target.display(), template = template.name(), "created script");
    Ok(target)
}

fn is_plain_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

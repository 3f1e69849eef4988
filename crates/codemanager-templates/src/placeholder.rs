//! Placeholder resolution and substitution.

use codemanager_config::Placeholder;
use codemanager_inspector::Inspection;
use tracing::debug;

use crate::error::TemplateError;

const SCRIPT_NAME: &str = "ScriptName";
const TEMPLATE_NAME: &str = "TemplateName";

/// Placeholders filled in by script creation; user values cannot override them.
pub const DEFAULT_PLACEHOLDERS: [&str; 2] = [SCRIPT_NAME, TEMPLATE_NAME];

/// A `%Name%` token on a single line.
pub const PLACEHOLDER_PATTERN: &str = r"%[^%\n]*%";

/// Whether `name` is one of [`DEFAULT_PLACEHOLDERS`].
#[must_use]
pub fn is_default_placeholder(name: &str) -> bool {
    DEFAULT_PLACEHOLDERS.contains(&name)
}

/// Builds the placeholder values for one script.
///
/// User placeholders named like a default one are dropped; `ScriptName` and
/// `TemplateName` are appended last.
#[must_use]
pub fn resolve_placeholders(
    user: &[Placeholder],
    script_name: &str,
    template_name: &str,
) -> Vec<Placeholder> {
    user.iter()
        .filter(|placeholder| !is_default_placeholder(&placeholder.name))
        .cloned()
        .chain([
            Placeholder::new(SCRIPT_NAME, script_name),
            Placeholder::new(TEMPLATE_NAME, template_name),
        ])
        .collect()
}

/// Replaces every placeholder in `text` with its value.
///
/// When a name appears twice in `values` the first entry wins.
///
/// # Errors
///
/// Returns [`TemplateError::MissingValue`] for a placeholder without a value
/// or with an empty one.
pub fn render(text: &str, values: &[Placeholder]) -> Result<String, TemplateError> {
    let mut inspection = Inspection::from_text(text);
    let handles = inspection.find_all(PLACEHOLDER_PATTERN)?;
    if handles.is_empty() {
        return Ok(text.to_owned());
    }

    for handle in &handles {
        let name = inspection.text(*handle)?.trim_matches('%').to_owned();
        let found = values
            .iter()
            .find(|placeholder| placeholder.name == name)
            .map(|placeholder| placeholder.value.as_str())
            .filter(|value| !value.is_empty());
        let Some(value) = found else {
            inspection.cancel();
            return Err(TemplateError::MissingValue { name });
        };
        inspection.set_text(*handle, value)?;
    }
    inspection.commit()?;
    debug!(placeholders = handles.len(), "substituted placeholders");
    Ok(inspection.document().to_owned())
}

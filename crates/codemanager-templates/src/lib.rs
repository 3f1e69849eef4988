//! Script templates with `%Name%` placeholders.
//!
//! Templates are `.txt` files kept in the template folder. Creating a script
//! runs the template through a text inspection: every placeholder becomes a
//! segment, each segment is replaced by its value and the committed text is
//! written to `{folder}/{ScriptName}.cs`.
//!
//! ```text
//! public class %ScriptName% : MonoBehaviour   // template "Behaviour.txt"
//! public class Player : MonoBehaviour         // Player.cs
//! ```

mod error;
mod placeholder;
mod script;
mod template;

pub use error::TemplateError;
pub use placeholder::{
    DEFAULT_PLACEHOLDERS, PLACEHOLDER_PATTERN, is_default_placeholder, render,
    resolve_placeholders,
};
pub use script::{SCRIPT_EXTENSION, create_script};
pub use template::{STOCK_TEMPLATE, ScriptTemplate, TEMPLATE_EXTENSION, create_template, discover};

#[cfg(test)]
mod tests;

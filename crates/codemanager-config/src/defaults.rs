//! Stock paths, log filter and rule set used when nothing is configured.

use std::path::PathBuf;

use crate::rules::{CodeDocumentation, CodeGuideline, NamedRegex, UnwantedCode};

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings file looked up when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "codemanager.json";

/// Folder script templates are read from when none is configured.
pub const DEFAULT_TEMPLATE_FOLDER: &str = "ScriptTemplates";

pub(crate) fn default_template_folder() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_FOLDER)
}

pub(crate) fn default_documentation_regex() -> String {
    patterns::DOCUMENTATION.to_owned()
}

/// Building blocks of the stock C# regexes.
///
/// The composite patterns expose the declared name as the `identifier`
/// group, which the stock guidelines check.
pub mod patterns {
    macro_rules! access {
        () => {
            r"\b(public\s*|private\s*|protected\s*|internal\s*)?"
        };
    }
    macro_rules! private_access {
        () => {
            r"\b(private\s*)"
        };
    }
    macro_rules! modifier {
        () => {
            r"\b(static\s*|virtual\s*|abstract\s*|readonly\s*|const\s*)?"
        };
    }
    macro_rules! type_name {
        () => {
            r"\b([A-Za-z0-9_\[\]<>]+)"
        };
    }
    macro_rules! identifier {
        () => {
            r"\b(?<identifier>[A-Za-z_][A-Za-z_0-9]*)"
        };
    }
    macro_rules! generic {
        () => {
            r"(<[A-Z]>)?"
        };
    }
    macro_rules! parameters {
        () => {
            r"\(\s*((params)?\s*(\b[A-Za-z_][A-Za-z_0-9\[\]<>]*)\s*(\b[A-Za-z_][A-Za-z_0-9]*)\s*,?\s*)*\s*\)"
        };
    }

    /// Optional access modifier.
    pub const ACCESS: &str = access!();
    /// Optional member modifier.
    pub const MODIFIER: &str = modifier!();
    /// Type name, including arrays and generic arguments.
    pub const TYPE: &str = type_name!();
    /// Declared name, captured as `identifier`.
    pub const IDENTIFIER: &str = identifier!();
    /// Optional single-letter generic parameter.
    pub const GENERIC: &str = generic!();
    /// Parenthesised parameter list.
    pub const PARAMETERS: &str = parameters!();

    /// Field declarations.
    pub const FIELD: &str = concat!(access!(), modifier!(), type_name!(), r"\s*", identifier!());
    /// Private field declarations.
    pub const PRIVATE_FIELD: &str = concat!(
        private_access!(),
        modifier!(),
        type_name!(),
        r"\s*",
        identifier!()
    );
    /// Method declarations.
    pub const METHOD: &str = concat!(
        access!(),
        r"\b(async\s*)?",
        modifier!(),
        type_name!(),
        r"\s*",
        identifier!(),
        r"\s*",
        generic!(),
        r"\s*",
        parameters!()
    );
    /// Class declarations.
    pub const CLASS: &str = concat!(r".*class.*", identifier!());
    /// Braces with nothing but whitespace between them.
    pub const EMPTY_CODE_BLOCK: &str = r"\{\s*\}";
    /// Names starting with a capital letter.
    pub const METHOD_NAME: &str = r"\b[A-Z][a-zA-Z_0-9]*";
    /// Names starting with a lowercase letter.
    pub const PRIVATE_FIELD_NAME: &str = r"\b[a-z][a-zA-Z_0-9]*";
    /// A line comment ending the text before documented code.
    pub const DOCUMENTATION: &str = r"[^\S]/{2,3}.*\n?$";
}

pub(crate) fn default_regexes() -> Vec<NamedRegex> {
    vec![
        NamedRegex::new("Empty Codeblock regex", patterns::EMPTY_CODE_BLOCK),
        NamedRegex::new("Method regex", patterns::METHOD),
        NamedRegex::new("Class regex", patterns::CLASS),
        NamedRegex::new("Field regex", patterns::FIELD),
        NamedRegex::new("Private Field regex", patterns::PRIVATE_FIELD),
        NamedRegex::new("Method Name regex", patterns::METHOD_NAME),
        NamedRegex::new("Private field name regex", patterns::PRIVATE_FIELD_NAME),
    ]
}

pub(crate) fn default_unwanted_code() -> Vec<UnwantedCode> {
    vec![UnwantedCode {
        id: 0,
        name: "Empty Codeblock".to_owned(),
        regex_index: Some(0),
        description: "No empty code blocks allowed.".to_owned(),
    }]
}

pub(crate) fn default_code_guidelines() -> Vec<CodeGuideline> {
    vec![
        CodeGuideline {
            id: 0,
            name: "Method Name".to_owned(),
            search_regex_index: Some(1),
            group_name: "identifier".to_owned(),
            match_regex_index: Some(5),
            description: "Methods have to start with a capital letter".to_owned(),
        },
        CodeGuideline {
            id: 0,
            name: "Private field name".to_owned(),
            search_regex_index: Some(4),
            group_name: "identifier".to_owned(),
            match_regex_index: Some(6),
            description: "private fields have to start with a lowercase letter".to_owned(),
        },
    ]
}

pub(crate) fn default_code_documentation() -> Vec<CodeDocumentation> {
    vec![CodeDocumentation {
        id: 0,
        name: "Documentation on class".to_owned(),
        regex_index: Some(2),
        description: "Classes must be documented".to_owned(),
    }]
}

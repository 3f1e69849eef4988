//! Template discovery, placeholder substitution and script creation.

use std::fs;

use codemanager_config::Placeholder;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{
    ScriptTemplate, TemplateError, create_script, create_template, discover, render,
    resolve_placeholders,
};

struct Workspace {
    dir: TempDir,
    template: ScriptTemplate,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Behaviour.txt");
    fs::write(
        &path,
        "// %Author% via %TemplateName%\npublic class %ScriptName% : MonoBehaviour\n{\n}",
    )
    .expect("write template");
    let template = ScriptTemplate::from_path(path).expect("template");
    Workspace { dir, template }
}

fn author() -> Vec<Placeholder> {
    vec![Placeholder::new("Author", "Morgan")]
}

// =============================================================================
// Placeholders
// =============================================================================

#[test]
fn user_placeholders_cannot_override_defaults() {
    let values = resolve_placeholders(
        &[
            Placeholder::new("ScriptName", "Hijack"),
            Placeholder::new("Author", "Morgan"),
        ],
        "Player",
        "Behaviour",
    );
    assert_eq!(
        values,
        vec![
            Placeholder::new("Author", "Morgan"),
            Placeholder::new("ScriptName", "Player"),
            Placeholder::new("TemplateName", "Behaviour"),
        ]
    );
}

#[rstest]
#[case("no placeholders", "no placeholders")]
#[case("%Author%", "Morgan")]
#[case("%Author% and %Author%", "Morgan and Morgan")]
#[case("100% sure\n50% done", "100% sure\n50% done")]
fn render_substitutes_known_values(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(render(text, &author()).expect("render"), expected);
}

#[rstest]
#[case("%Unknown%", "Unknown")]
#[case("%Empty%", "Empty")]
fn render_refuses_missing_values(#[case] text: &str, #[case] name: &str) {
    let values = vec![Placeholder::new("Empty", "")];
    let err = render(text, &values).expect_err("missing value");
    assert!(matches!(err, TemplateError::MissingValue { name: found } if found == name));
}

// =============================================================================
// Templates
// =============================================================================

#[test]
fn discover_lists_text_files_by_name() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("Zeta.txt"), "").expect("write");
    fs::write(dir.path().join("Alpha.TXT"), "").expect("write");
    fs::write(dir.path().join("Readme.md"), "").expect("write");
    fs::create_dir(dir.path().join("Nested.txt")).expect("dir");

    let names: Vec<String> = discover(dir.path())
        .expect("discover")
        .iter()
        .map(|template| template.name().to_owned())
        .collect();
    assert_eq!(names, vec!["Alpha".to_owned(), "Zeta".to_owned()]);
}

#[test]
fn create_template_writes_the_stock_behaviour_once() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Behaviour.txt");

    let template = create_template(&path).expect("create");
    assert_eq!(template.name(), "Behaviour");
    let text = template.load().expect("load");
    assert!(text.contains("public class %ScriptName% : MonoBehaviour"));

    assert!(matches!(
        create_template(&path),
        Err(TemplateError::AlreadyExists { .. })
    ));
}

#[test]
fn templates_need_a_text_extension() {
    assert!(matches!(
        ScriptTemplate::from_path("Behaviour.cs"),
        Err(TemplateError::NotATemplate { .. })
    ));
}

// =============================================================================
// Scripts
// =============================================================================

#[rstest]
fn create_script_fills_every_placeholder(workspace: Workspace) {
    let path = create_script("Player", &workspace.template, workspace.dir.path(), &author())
        .expect("create");

    assert_eq!(path, workspace.dir.path().join("Player.cs"));
    let text = fs::read_to_string(path).expect("read");
    assert_eq!(
        text,
        "// Morgan via Behaviour\npublic class Player : MonoBehaviour\n{\n}\n"
    );
}

#[rstest]
fn create_script_refuses_existing_files(workspace: Workspace) {
    let existing = workspace.dir.path().join("Player.cs");
    fs::write(&existing, "keep").expect("write");

    let err = create_script("Player", &workspace.template, workspace.dir.path(), &author())
        .expect_err("exists");
    assert!(matches!(err, TemplateError::AlreadyExists { .. }));
    assert_eq!(fs::read_to_string(existing).expect("read"), "keep");
}

#[rstest]
fn created_scripts_leave_no_temporary_files(workspace: Workspace) {
    let scripts = TempDir::new().expect("script dir");
    create_script("Player", &workspace.template, scripts.path(), &author()).expect("create");

    let entries: Vec<String> = fs::read_dir(scripts.path())
        .expect("list")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["Player.cs".to_owned()]);
}

#[rstest]
fn failed_writes_leave_no_partial_script(workspace: Workspace) {
    let missing = workspace.dir.path().join("absent");

    let err = create_script("Player", &workspace.template, &missing, &author())
        .expect_err("missing folder");
    assert!(matches!(err, TemplateError::Write { .. }));
    assert!(!missing.join("Player.cs").exists());

    fs::create_dir(&missing).expect("create folder");
    create_script("Player", &workspace.template, &missing, &author()).expect("retry");
    assert!(missing.join("Player.cs").is_file());
}

#[rstest]
fn missing_values_leave_no_file(workspace: Workspace) {
    let err = create_script("Player", &workspace.template, workspace.dir.path(), &[])
        .expect_err("missing author");
    assert!(matches!(err, TemplateError::MissingValue { name } if name == "Author"));
    assert!(!workspace.dir.path().join("Player.cs").exists());
}

#[rstest]
#[case("")]
#[case("..")]
#[case("Sub/Player")]
fn script_names_must_be_plain(workspace: Workspace, #[case] name: &str) {
    let err = create_script(name, &workspace.template, workspace.dir.path(), &author())
        .expect_err("invalid name");
    assert!(matches!(err, TemplateError::InvalidScriptName { .. }));
}

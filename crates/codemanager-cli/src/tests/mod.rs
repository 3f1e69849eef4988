//! In-process tests for the CLI runtime.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use codemanager_config::Settings;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::run;

struct Outcome {
    status: ExitCode,
    stdout: String,
    stderr: String,
}

impl Outcome {
    fn exited_with(&self, code: u8) -> bool {
        format!("{:?}", self.status) == format!("{:?}", ExitCode::from(code))
    }
}

fn invoke<I, S>(args: I) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let argv = std::iter::once(OsString::from("codemanager")).chain(args.into_iter().map(Into::into));
    let status = run(argv, &mut stdout, &mut stderr);
    Outcome {
        status,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

#[fixture]
fn project() -> TempDir {
    TempDir::new().expect("temp dir")
}

fn settings_arg(dir: &Path) -> OsString {
    dir.join("codemanager.json").into_os_string()
}

#[test]
fn help_goes_to_stdout() {
    let outcome = invoke(["--help"]);
    assert!(outcome.stdout.contains("test-regex"));
    assert!(outcome.stderr.is_empty());
    assert!(outcome.exited_with(0));
}

#[test]
fn unknown_commands_are_reported() {
    let outcome = invoke(["frobnicate"]);
    assert!(outcome.stdout.is_empty());
    assert!(!outcome.stderr.is_empty());
    assert!(outcome.exited_with(2));
}

#[test]
fn test_regex_lists_matches_with_lines() {
    let outcome = invoke(["test-regex", r"\d+", "a1\nb22"]);
    assert_eq!(outcome.stdout, "#0 line 1 @1+1: \"1\"\n#1 line 2 @4+2: \"22\"\n");
}

#[test]
fn test_regex_reports_broken_patterns() {
    let outcome = invoke(["test-regex", "(", "text"]);
    assert!(outcome.stderr.starts_with("codemanager: "));
    assert!(outcome.exited_with(2));
}

#[rstest]
fn init_refuses_to_overwrite(project: TempDir) {
    let settings = settings_arg(project.path());

    let first = invoke([OsString::from("--settings"), settings.clone(), "init".into()]);
    assert!(first.stdout.starts_with("created settings"));
    let written = Settings::load(Path::new(&settings)).expect("load settings");
    assert_eq!(written, Settings::default());

    let second = invoke([OsString::from("--settings"), settings, "init".into()]);
    assert!(second.stderr.contains("already exists"));
}

#[rstest]
fn scan_reports_violations_in_ad_hoc_folders(project: TempDir) {
    let scripts = project.path().join("Scripts");
    fs::create_dir(&scripts).expect("scripts dir");
    fs::write(scripts.join("Enemy.cs"), "public class Enemy\n{\n}\n").expect("write script");

    let outcome = invoke([
        OsString::from("--settings"),
        settings_arg(project.path()),
        "scan".into(),
        scripts.into_os_string(),
    ]);

    assert!(outcome.stdout.contains("Unwanted Code found in: Enemy.cs: 2"));
    assert!(outcome.stdout.contains("Code not documented in: Enemy.cs: 1"));
    assert!(outcome.stdout.ends_with("2 violation(s) in 1 folder(s)\n"));
    assert!(outcome.exited_with(1));
}

#[rstest]
fn scan_without_folders_has_nothing_to_do(project: TempDir) {
    let outcome = invoke([
        OsString::from("--settings"),
        settings_arg(project.path()),
        "scan".into(),
    ]);
    assert_eq!(outcome.stdout, "no script folders to scan\n");
}

#[rstest]
fn scripts_are_created_from_named_templates(project: TempDir) {
    let templates = project.path().join("ScriptTemplates");
    fs::create_dir(&templates).expect("template dir");
    let settings_path = settings_arg(project.path());
    Settings {
        template_folder: templates.clone(),
        ..Settings::default()
    }
    .save(Path::new(&settings_path))
    .expect("save settings");

    let created = invoke([
        OsString::from("new-template"),
        templates.join("Behaviour.txt").into_os_string(),
    ]);
    assert!(created.stdout.starts_with("created template"));

    let listed = invoke([
        OsString::from("--settings"),
        settings_path.clone(),
        "templates".into(),
    ]);
    assert!(listed.stdout.starts_with("Behaviour\t"));

    let script = invoke([
        OsString::from("--settings"),
        settings_path,
        "new-script".into(),
        "Player".into(),
        "--template".into(),
        "Behaviour".into(),
        "--folder".into(),
        project.path().as_os_str().to_owned(),
    ]);
    assert!(script.stdout.starts_with("created script"), "{}", script.stderr);
    let text = fs::read_to_string(project.path().join("Player.cs")).expect("read script");
    assert!(text.contains("public class Player : MonoBehaviour"));
}

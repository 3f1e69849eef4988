//! Folder scanner tests against the stock rule set.

use std::fs;
use std::path::Path;

use codemanager_config::{ScriptFolder, Settings, UnwantedCode};
use codemanager_inspector::{InspectionMode, Inspector};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{FolderScanner, ViolationKind};

const PLAYER: &str = "\
using UnityEngine;

/// Player controller.
public class Player : MonoBehaviour
{
    private int health;
    private int Speed;

    void Start()
    {
    }

    public void update()
    {
        health = 1;
    }
}
";

const ENEMY: &str = "public class Enemy\n{\n}\n";

#[fixture]
fn scripts() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("Player.cs"), PLAYER).expect("write player");
    fs::write(dir.path().join("Enemy.cs"), ENEMY).expect("write enemy");
    fs::write(dir.path().join("notes.txt"), "{ }").expect("write notes");
    fs::create_dir(dir.path().join("Nested")).expect("nested dir");
    fs::write(dir.path().join("Nested").join("Boss.cs"), ENEMY).expect("write boss");
    dir
}

fn folder(path: &Path, include_subdirectories: bool, rules: Vec<u32>) -> ScriptFolder {
    ScriptFolder {
        name: "Scripts".to_owned(),
        path: path.to_path_buf(),
        include_subdirectories,
        rules,
    }
}

fn summary(violations: &[crate::Violation]) -> Vec<(String, ViolationKind, usize)> {
    violations
        .iter()
        .map(|violation| {
            let file = violation
                .source()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            (file, violation.kind(), violation.line())
        })
        .collect()
}

#[rstest]
fn stock_rules_report_each_offence(scripts: TempDir) {
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_folder(&folder(scripts.path(), false, vec![1, 2, 3, 4]))
        .expect("scan");

    assert_eq!(
        summary(&violations),
        vec![
            ("Enemy.cs".to_owned(), ViolationKind::UnwantedCode, 2),
            ("Enemy.cs".to_owned(), ViolationKind::Documentation, 1),
            ("Player.cs".to_owned(), ViolationKind::UnwantedCode, 10),
            ("Player.cs".to_owned(), ViolationKind::Guideline, 13),
            ("Player.cs".to_owned(), ViolationKind::Guideline, 7),
        ]
    );
    assert_eq!(violations[4].message(), "Codeguideline violation in: Player.cs: 7");
    assert_eq!(
        violations[4].description(),
        "private fields have to start with a lowercase letter"
    );
    drop(scanner);
    assert_eq!(inspector.open_files(), 0);
}

#[rstest]
fn subdirectories_are_scanned_on_request(scripts: TempDir) {
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_folder(&folder(scripts.path(), true, vec![4]))
        .expect("scan");

    let files: Vec<String> = summary(&violations)
        .into_iter()
        .map(|(file, _, _)| file)
        .collect();
    assert_eq!(files, vec!["Enemy.cs".to_owned(), "Boss.cs".to_owned()]);
}

#[cfg(unix)]
#[rstest]
fn symlinked_directories_are_not_followed(scripts: TempDir) {
    std::os::unix::fs::symlink(scripts.path(), scripts.path().join("loop")).expect("symlink");
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_folder(&folder(scripts.path(), true, vec![4]))
        .expect("scan");

    let files: Vec<String> = summary(&violations)
        .into_iter()
        .map(|(file, _, _)| file)
        .collect();
    assert_eq!(files, vec!["Enemy.cs".to_owned(), "Boss.cs".to_owned()]);
    assert!(
        violations
            .iter()
            .all(|violation| !violation.source().starts_with(scripts.path().join("loop")))
    );
}

#[rstest]
fn folders_without_rules_are_skipped(scripts: TempDir) {
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_folder(&folder(scripts.path(), false, vec![42]))
        .expect("scan");
    assert!(violations.is_empty());
}

#[rstest]
fn rules_sharing_a_regex_each_report(scripts: TempDir) {
    let mut settings = Settings::default();
    settings.unwanted_code.push(UnwantedCode {
        id: 0,
        name: "Braces".to_owned(),
        regex_index: Some(0),
        description: "Second rule on the same regex".to_owned(),
    });
    settings.assign_rule_ids();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_file(
            &scripts.path().join("Enemy.cs"),
            &[
                settings.rule(1).expect("rule 1"),
                settings.rule(5).expect("rule 5"),
            ],
        )
        .expect("scan");

    let rules: Vec<&str> = violations.iter().map(crate::Violation::rule).collect();
    assert_eq!(rules, vec!["Empty Codeblock", "Braces"]);
}

#[rstest]
fn files_held_by_a_writer_are_skipped(scripts: TempDir) {
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let _writer = inspector
        .inspect_file(scripts.path().join("Enemy.cs"), InspectionMode::ReadWrite)
        .expect("writer");
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    let violations = scanner
        .scan_folder(&folder(scripts.path(), false, vec![1]))
        .expect("scan");

    assert_eq!(
        summary(&violations),
        vec![("Player.cs".to_owned(), ViolationKind::UnwantedCode, 10)]
    );
}

#[test]
fn missing_folders_fail_the_scan() {
    let dir = TempDir::new().expect("temp dir");
    let settings = Settings::default();
    let mut inspector = Inspector::new();
    let mut scanner = FolderScanner::new(&settings, &mut inspector).expect("scanner");

    assert!(
        scanner
            .scan_folder(&folder(&dir.path().join("absent"), false, vec![1]))
            .is_err()
    );
}

#[test]
fn broken_documentation_regex_is_rejected() {
    let settings = Settings {
        documentation_regex: "(".to_owned(),
        ..Settings::default()
    };
    let mut inspector = Inspector::new();
    assert!(FolderScanner::new(&settings, &mut inspector).is_err());
}

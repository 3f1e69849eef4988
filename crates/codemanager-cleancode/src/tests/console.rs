use std::path::Path;

use rstest::{fixture, rstest};

use crate::{Console, Violation, ViolationKind};

#[fixture]
fn console() -> Console {
    let mut console = Console::new();
    console.collect([
        Violation::new(
            ViolationKind::UnwantedCode,
            "Assets/Enemy.cs",
            2,
            "Empty Codeblock",
            "No empty code blocks allowed.",
        ),
        Violation::new(
            ViolationKind::Documentation,
            "Assets/Enemy.cs",
            1,
            "Documentation on class",
            "Classes must be documented",
        ),
        Violation::new(
            ViolationKind::UnwantedCode,
            "Assets/Player.cs",
            10,
            "Empty Codeblock",
            "No empty code blocks allowed.",
        ),
    ]);
    console
}

#[rstest]
#[case(ViolationKind::UnwantedCode, "Unwanted Code found in: Player.cs: 3")]
#[case(ViolationKind::Documentation, "Code not documented in: Player.cs: 3")]
#[case(ViolationKind::Guideline, "Codeguideline violation in: Player.cs: 3")]
fn messages_name_the_file_and_line(#[case] kind: ViolationKind, #[case] expected: &str) {
    let violation = Violation::new(kind, "Assets/Scripts/Player.cs", 3, "rule", "description");
    assert_eq!(violation.message(), expected);
    assert_eq!(violation.source(), Path::new("Assets/Scripts/Player.cs"));
}

#[rstest]
fn counts_group_by_kind(console: Console) {
    let counts = console.counts();
    assert_eq!(counts.get(&ViolationKind::UnwantedCode), Some(&2));
    assert_eq!(counts.get(&ViolationKind::Documentation), Some(&1));
    assert_eq!(counts.get(&ViolationKind::Guideline), None);
    assert_eq!(console.of_kind(ViolationKind::UnwantedCode).count(), 2);
}

#[rstest]
fn render_keeps_scan_order(console: Console) {
    let lines = console.render();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Assets/Enemy.cs:2: [unwanted_code] No empty code blocks allowed. - Unwanted Code found in: Enemy.cs: 2"
    );
    assert!(lines[2].starts_with("Assets/Player.cs:10:"));
}

#[rstest]
fn clear_empties_the_console(mut console: Console) {
    assert_eq!((&console).into_iter().count(), 3);
    console.clear();
    assert!(console.is_empty());
    assert_eq!(console.len(), 0);
}

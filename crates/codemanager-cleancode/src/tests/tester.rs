use codemanager_inspector::RegexOptions;
use rstest::rstest;

use crate::{RegexTester, TesterGroup};

#[test]
fn lists_matches_with_lines_and_named_groups() {
    let matches = RegexTester::default()
        .test(r"(?<key>\w+)=(\d+)", "a=1\nbe=22")
        .expect("test");

    assert_eq!(matches.len(), 2);
    let second = &matches[1];
    assert_eq!(second.index, 1);
    assert_eq!(second.line, 2);
    assert_eq!(second.start, 4);
    assert_eq!(second.length, 5);
    assert_eq!(second.value, "be=22");
    assert_eq!(
        second.groups,
        vec![TesterGroup {
            name: "key".to_owned(),
            value: "be".to_owned(),
        }]
    );
    assert_eq!(second.to_string(), r#"#1 line 2 @4+5: "be=22" key="be""#);
}

#[rstest]
#[case("", 0)]
#[case("no digits here", 0)]
#[case("1 22 333", 3)]
fn counts_matches(#[case] text: &str, #[case] expected: usize) {
    let matches = RegexTester::default().test(r"\d+", text).expect("test");
    assert_eq!(matches.len(), expected);
}

#[test]
fn options_apply_to_every_pattern() {
    let tester = RegexTester::new(RegexOptions {
        case_insensitive: true,
        ..RegexOptions::default()
    });
    let matches = tester.test("player", "Player PLAYER").expect("test");
    assert_eq!(matches.len(), 2);
}

#[test]
fn broken_patterns_are_reported() {
    assert!(RegexTester::default().test("(", "text").is_err());
}

#[test]
fn right_to_left_cannot_list_matches() {
    let tester = RegexTester::new(RegexOptions {
        right_to_left: true,
        ..RegexOptions::default()
    });
    assert!(tester.test("a", "aaa").is_err());
}

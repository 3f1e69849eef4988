//! Line-ending normalisation applied when file sessions are written back.

use std::borrow::Cow;

/// Newline sequence of the host platform.
#[cfg(windows)]
pub const HOST_NEWLINE: &str = "\r\n";

/// Newline sequence of the host platform.
#[cfg(not(windows))]
pub const HOST_NEWLINE: &str = "\n";

/// Rewrites every `\r\n`, lone `\r` and lone `\n` to [`HOST_NEWLINE`].
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    normalize_line_endings_to(text, HOST_NEWLINE)
}

/// Rewrites every `\r\n`, lone `\r` and lone `\n` to `newline`.
///
/// Text that already uses `newline` throughout is returned borrowed.
#[must_use]
pub fn normalize_line_endings_to<'a>(text: &'a str, newline: &str) -> Cow<'a, str> {
    if is_normalized(text, newline) {
        return Cow::Borrowed(text);
    }

    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                normalized.push_str(newline);
            }
            '\n' => normalized.push_str(newline),
            other => normalized.push(other),
        }
    }
    Cow::Owned(normalized)
}

fn is_normalized(text: &str, newline: &str) -> bool {
    match newline {
        "\n" => !text.contains('\r'),
        "\r\n" => {
            let bytes = text.as_bytes();
            bytes.iter().enumerate().all(|(index, byte)| match byte {
                b'\r' => bytes.get(index + 1) == Some(&b'\n'),
                b'\n' => index > 0 && bytes.get(index - 1) == Some(&b'\r'),
                _ => true,
            })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a\r\nb\rc\nd", "\n", "a\nb\nc\nd")]
    #[case("a\r\nb\rc\nd", "\r\n", "a\r\nb\r\nc\r\nd")]
    #[case("\r\r\n\n", "\n", "\n\n\n")]
    #[case("no newline", "\r\n", "no newline")]
    fn rewrites_every_variant(#[case] input: &str, #[case] newline: &str, #[case] expected: &str) {
        assert_eq!(normalize_line_endings_to(input, newline), expected);
    }

    #[rstest]
    #[case("a\nb\n", "\n")]
    #[case("a\r\nb\r\n", "\r\n")]
    fn normalized_text_is_borrowed(#[case] input: &str, #[case] newline: &str) {
        assert!(matches!(
            normalize_line_endings_to(input, newline),
            Cow::Borrowed(_)
        ));
    }
}

//! String utility functions for display-safe output.

use std::borrow::Cow;

/// Escape non-printable characters in a name before it is printed.
///
/// Names made only of printable characters, with no backslash, are returned
/// unchanged. Otherwise every backslash is doubled and every non-printable
/// character is written with Rust's debug escapes, e.g. a newline becomes
/// `\n` and a bell character becomes `\u{7}`. A name that already holds the
/// two characters `\` `n` therefore prints as `\\n`, never as `\n`.
///
/// Printable means graphic: letters, marks, numbers, punctuation, symbols
/// and the ASCII space. Other spaces (NBSP, ideographic space), line and
/// paragraph separators, and invisible format characters are escaped.
///
/// # Example
///
/// ```
/// use dagls::string_utils::escape_non_print;
///
/// assert_eq!(escape_non_print("notes.txt"), "notes.txt");
/// assert_eq!(escape_non_print("bad\nname"), "bad\\nname");
/// assert_eq!(escape_non_print("bad\\name"), "bad\\\\name");
/// ```
pub fn escape_non_print(s: &str) -> Cow<'_, str> {
    if s.chars().all(|c| c != '\\' && is_printable(c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if c == '\\' {
            out.push_str("\\\\");
        } else if is_printable(c) {
            out.push(c);
        } else {
            out.extend(c.escape_default());
        }
    }
    Cow::Owned(out)
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !c.is_control() && !c.is_whitespace() && !is_format(c) && !is_private_use(c)
}

/// Unicode format characters (category Cf): zero-width and bidi controls,
/// soft hyphen, invisible operators, tag characters.
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{890}'..='\u{891}'
            | '\u{8e2}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{110bd}'
            | '\u{110cd}'
            | '\u{13430}'..='\u{1343f}'
            | '\u{1bca0}'..='\u{1bca3}'
            | '\u{1d173}'..='\u{1d17a}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{e000}'..='\u{f8ff}' | '\u{f0000}'..='\u{ffffd}' | '\u{100000}'..='\u{10fffd}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_names_borrowed() {
        assert!(matches!(escape_non_print("main.rs"), Cow::Borrowed(_)));
        assert_eq!(escape_non_print("with space"), "with space");
        assert_eq!(escape_non_print("ünïcödé"), "ünïcödé");
        assert_eq!(escape_non_print("日本語"), "日本語");
    }

    #[test]
    fn test_backslash_always_escaped() {
        assert_eq!(escape_non_print(r"a\b"), r"a\\b");
        assert!(matches!(escape_non_print(r"a\b"), Cow::Owned(_)));
    }

    #[test]
    fn test_literal_backslash_n_differs_from_newline() {
        let literal = escape_non_print("x\\n");
        let newline = escape_non_print("x\n");
        assert_eq!(literal, r"x\\n");
        assert_eq!(newline, r"x\n");
        assert_ne!(literal, newline);
    }

    #[test]
    fn test_control_characters_escaped() {
        assert_eq!(escape_non_print("a\tb"), "a\\tb");
        assert_eq!(escape_non_print("bell\u{7}"), "bell\\u{7}");
        assert_eq!(escape_non_print("esc\u{1b}[0m"), "esc\\u{1b}[0m");
    }

    #[test]
    fn test_backslash_escaped_when_mixed() {
        assert_eq!(escape_non_print("a\\b\n"), "a\\\\b\\n");
    }

    #[test]
    fn test_non_graphic_spaces_escaped() {
        assert_eq!(escape_non_print("a\u{a0}b"), "a\\u{a0}b");
        assert_eq!(escape_non_print("a\u{3000}b"), "a\\u{3000}b");
        assert_eq!(escape_non_print("a\u{2028}b"), "a\\u{2028}b");
    }

    #[test]
    fn test_format_characters_escaped() {
        assert_eq!(escape_non_print("soft\u{ad}hyphen"), "soft\\u{ad}hyphen");
        assert_eq!(escape_non_print("zero\u{200b}width"), "zero\\u{200b}width");
        assert_eq!(escape_non_print("word\u{2060}joiner"), "word\\u{2060}joiner");
        assert_eq!(escape_non_print("\u{feff}bom"), "\\u{feff}bom");
    }

    #[test]
    fn test_bidi_override_escaped() {
        assert_eq!(escape_non_print("evil\u{202e}txt"), "evil\\u{202e}txt");
    }

    #[test]
    fn test_private_use_escaped() {
        assert_eq!(escape_non_print("icon\u{e000}"), "icon\\u{e000}");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(escape_non_print(""), "");
    }
}

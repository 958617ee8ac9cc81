//! Key text normalization and level-header cleaning.

/// Label that prefixes every numbered level column.
pub const LEVEL_LABEL: &str = "سطح";

/// Normalize a key: trim, collapse whitespace runs to one space, and fold the
/// Arabic Yeh/Kaf look-alikes onto their Persian forms.
pub fn normalize_text(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .map(|c| match c {
            '\u{064A}' => '\u{06CC}',
            '\u{0643}' => '\u{06A9}',
            other => other,
        })
        .collect()
}

/// Canonicalize a column header.
///
/// Headers that carry a level number (`"3"`, `"سطح 3"`, `"3 سطح"`,
/// `"سطح سطح ۳"`) become `"سطح 3"`; anything else is returned as normalized
/// text. Applying this twice gives the same result as applying it once.
pub fn clean_header(header: &str) -> String {
    let text = normalize_text(header);
    let stripped: String = text
        .replace(LEVEL_LABEL, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match level_number(&stripped) {
        Some(number) => format!("{} {}", LEVEL_LABEL, number),
        None => text,
    }
}

/// ASCII rendering of a non-empty run of digits, accepting Persian and
/// Arabic-Indic digits as well.
fn level_number(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    value.chars().map(ascii_digit).collect()
}

fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
        '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_whitespace() {
        assert_eq!(normalize_text("  کارشناسی   ارشد \t"), "کارشناسی ارشد");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_normalize_text_folds_look_alikes() {
        // Arabic Yeh and Kaf
        assert_eq!(
            normalize_text("\u{0639}\u{0644}\u{0645}\u{064A}"),
            "\u{0639}\u{0644}\u{0645}\u{06CC}"
        );
        assert_eq!(
            normalize_text("\u{0643}\u{0627}\u{0631}\u{062F}\u{0627}\u{0646}\u{064A}"),
            "\u{06A9}\u{0627}\u{0631}\u{062F}\u{0627}\u{0646}\u{06CC}"
        );
        assert_eq!(normalize_text("\u{06A9}\u{06CC}"), "\u{06A9}\u{06CC}");
    }

    #[test]
    fn test_clean_header_variants() {
        assert_eq!(clean_header("1"), "سطح 1");
        assert_eq!(clean_header("سطح 2"), "سطح 2");
        assert_eq!(clean_header("3 سطح"), "سطح 3");
        assert_eq!(clean_header("سطح سطح 4"), "سطح 4");
        assert_eq!(clean_header("  سطح5 "), "سطح 5");
        assert_eq!(clean_header("سطح ۶"), "سطح 6");
        assert_eq!(clean_header("12"), "سطح 12");
    }

    #[test]
    fn test_clean_header_keeps_non_level_text() {
        assert_eq!(clean_header(" گروه   آموزشی "), "گروه آموزشی");
        assert_eq!(clean_header("سطح"), "سطح");
        assert_eq!(clean_header("سطح A"), "سطح A");
    }

    #[test]
    fn test_clean_header_idempotent() {
        for header in ["1", "سطح 1", "1 سطح", "سطح سطح 9", "نظری", "سطح", ""] {
            let once = clean_header(header);
            assert_eq!(clean_header(&once), once, "header {header:?}");
        }
    }
}

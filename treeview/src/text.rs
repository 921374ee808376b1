//! Display-width helpers.

use unicode_width::UnicodeWidthChar;

pub const ELLIPSIS: char = '…';

/// Columns `s` occupies when drawn one cell per character.
///
/// Matches how rows are drawn: zero-width characters take no cell and
/// grapheme clusters are not merged.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Shorten `s` to at most `max_width` columns, ending in an ellipsis.
///
/// Strings that already fit are returned unchanged.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - char_width(ELLIPSIS);
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push(ELLIPSIS);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitting_string_is_unchanged() {
        assert_eq!(truncate_to_width("→ Child1", 8), "→ Child1");
        assert_eq!(truncate_to_width("→ Child1", 40), "→ Child1");
    }

    #[test]
    fn test_truncated_string_fits_with_ellipsis() {
        let out = truncate_to_width("→ A very long label", 8);
        assert_eq!(out, "→ A ver…");
        assert_eq!(display_width(&out), 8);
    }

    #[test]
    fn test_wide_chars_never_overflow() {
        // Each CJK char is two columns wide.
        let out = truncate_to_width("日本語テキスト", 6);
        assert!(display_width(&out) <= 6);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_joined_emoji_measured_per_char() {
        let family = "👨\u{200d}👩\u{200d}👧";
        assert_eq!(display_width(family), 6);

        let out = truncate_to_width(&format!("→ {family}{family}"), 7);
        assert_eq!(out, "→ 👨\u{200d}👩\u{200d}…");
        assert!(display_width(&out) <= 7);
    }

    #[test]
    fn test_zero_width_yields_empty() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}

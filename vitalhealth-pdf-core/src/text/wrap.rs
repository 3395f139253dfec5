//! Greedy line wrapping against measured font widths.

use crate::text::{measure_text, Font};

/// Splits `text` into lines no wider than `max_width` when set in `font` at
/// `font_size`.
///
/// Each `\n`-separated physical line is wrapped on its own, so author line
/// breaks survive. Tokens are whitespace-delimited and joined back with a
/// single space. A token wider than `max_width` is placed alone on its line
/// and never split. Blank physical lines produce no output.
pub fn wrap_lines(text: &str, max_width: f64, font: Font, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for physical_line in text.split('\n') {
        wrap_physical_line(physical_line, max_width, font, font_size, &mut lines);
    }
    lines
}

fn wrap_physical_line(
    text: &str,
    max_width: f64,
    font: Font,
    font_size: f64,
    lines: &mut Vec<String>,
) {
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let tentative = format!("{line} {word}");
        if measure_text(&tentative, font, font_size) <= max_width {
            line = tentative;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 515.0;

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_lines("", WIDTH, Font::Helvetica, 11.0).is_empty());
        assert!(wrap_lines("   \t ", WIDTH, Font::Helvetica, 11.0).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap_lines("Todo en orden", WIDTH, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["Todo en orden"]);
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        let lines = wrap_lines("a   b\tc", WIDTH, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["a b c"]);
    }

    #[test]
    fn test_wraps_at_width() {
        // "aaaa" is 4 * 556 = 2224 units, i.e. 22.24pt at size 10
        let lines = wrap_lines("aaaa aaaa aaaa", 50.0, Font::Helvetica, 10.0);
        assert_eq!(lines, vec!["aaaa aaaa", "aaaa"]);
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let max_width = measure_text("ab cd", Font::Helvetica, 11.0);
        let lines = wrap_lines("ab cd", max_width, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["ab cd"]);
    }

    #[test]
    fn test_oversized_token_is_alone() {
        let lines = wrap_lines("a supercalifragilistic b", 30.0, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_hard_breaks_are_preserved() {
        let lines = wrap_lines("Line one\nLine two", WIDTH, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["Line one", "Line two"]);
    }

    #[test]
    fn test_blank_physical_lines_are_skipped() {
        let lines = wrap_lines("first\n\n\nsecond\r\n", WIDTH, Font::Helvetica, 11.0);
        assert_eq!(lines, vec!["first", "second"]);
    }
}
